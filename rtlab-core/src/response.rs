use serde::{Deserialize, Serialize};

use crate::stimulus::{Color, Descriptor};

/// What the subject picked, already resolved by the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// A choice option, by label.
    Label(Color),
    /// A disjunctive item, by its attributes.
    Item(Descriptor),
}

/// Response event delivered to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Space bar, click on the stimulus area, button press.
    Generic,
    Select(Selection),
}

impl Response {
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Response::Generic => None,
            Response::Select(s) => Some(s),
        }
    }
}
