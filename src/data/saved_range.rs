use crate::calc::selection::Range;
use crate::data::persistence::Persistable;
use serde::{Deserialize, Serialize};

/// The host's highlight range, kept between runs.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct SavedRange {
    #[serde(default)]
    pub range: Range,
}

impl Persistable for SavedRange {
    fn filename() -> &'static str {
        "range.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl SavedRange {
    pub fn new(range: Range) -> Self {
        SavedRange { range }
    }

    pub fn clear(&mut self) {
        self.range = Range::cleared();
    }
}
