use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{ParseAlgorithmError, RangeError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(RunId);

/// Smallest value a generated element may take.
pub const VALUE_MIN: u32 = 1;
/// Largest value a generated element may take.
pub const VALUE_MAX: u32 = 400;

pub const ARRAY_SIZE_MIN: usize = 10;
pub const ARRAY_SIZE_MAX: usize = 200;
pub const ARRAY_SIZE_DEFAULT: usize = 50;

/// Clamps a requested array size into the selectable range.
pub fn clamp_array_size(size: usize) -> usize {
    size.clamp(ARRAY_SIZE_MIN, ARRAY_SIZE_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmId {
    #[default]
    BubbleSort,
    InsertionSort,
    SelectionSort,
    QuickSort,
    MergeSort,
    HeapSort,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 6] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::QuickSort,
        AlgorithmId::MergeSort,
        AlgorithmId::HeapSort,
    ];

    /// Stable identifier used in settings files and launch flags.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "bubble_sort",
            AlgorithmId::InsertionSort => "insertion_sort",
            AlgorithmId::SelectionSort => "selection_sort",
            AlgorithmId::QuickSort => "quick_sort",
            AlgorithmId::MergeSort => "merge_sort",
            AlgorithmId::HeapSort => "heap_sort",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "Bubble Sort",
            AlgorithmId::InsertionSort => "Insertion Sort",
            AlgorithmId::SelectionSort => "Selection Sort",
            AlgorithmId::QuickSort => "Quick Sort",
            AlgorithmId::MergeSort => "Merge Sort",
            AlgorithmId::HeapSort => "Heap Sort",
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = ParseAlgorithmError;

    /// Accepts the snake_case identifier, the camelCase form (`bubbleSort`) or
    /// the short name (`bubble`), ignoring case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let short = normalized.strip_suffix("sort").unwrap_or(&normalized);
        let algorithm = match short {
            "bubble" => AlgorithmId::BubbleSort,
            "insertion" => AlgorithmId::InsertionSort,
            "selection" => AlgorithmId::SelectionSort,
            "quick" => AlgorithmId::QuickSort,
            "merge" => AlgorithmId::MergeSort,
            "heap" => AlgorithmId::HeapSort,
            _ => return Err(ParseAlgorithmError::new(raw)),
        };
        Ok(algorithm)
    }
}

/// User-selected animation speed in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);
    pub const DEFAULT: Speed = Speed(50);

    pub fn new(value: u8) -> Result<Self, RangeError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RangeError::new(
                "speed",
                i64::from(value),
                i64::from(Self::MIN.0),
                i64::from(Self::MAX.0),
            ))
        }
    }

    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Inter-step delay for this speed: `101 - speed` milliseconds, so speed 1
    /// waits 100ms and speed 100 waits 1ms.
    pub fn delay(self) -> Duration {
        Duration::from_millis(101 - u64::from(self.0))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Speed {
    type Error = RangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(value: Speed) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Cancelled,
    Completed,
}

impl RunState {
    /// A run is active while it is running or paused.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    pub fn can_start(self) -> bool {
        !self.is_active()
    }

    pub fn label(self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Running => "Running",
            RunState::Paused => "Paused",
            RunState::Cancelled => "Cancelled",
            RunState::Completed => "Completed",
        }
    }
}

/// Color role a renderer applies to the bars named by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    None,
    Compared,
    Scanning,
    Pivot,
    Swapped,
}
