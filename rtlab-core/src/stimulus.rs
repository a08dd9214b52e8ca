use serde::{Deserialize, Serialize};

use crate::paradigm::StimulusKind;

/// Palette colors with their render values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    White,
    Black,
    Orange,
    Purple,
}

impl Color {
    /// Full palette, high-contrast entries first.
    pub const PALETTE: [Color; 8] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::White,
        Color::Black,
        Color::Orange,
        Color::Purple,
    ];

    /// The subset every generated stimulus draws from.
    pub const HIGH_CONTRAST: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Black => "black",
            Color::Orange => "orange",
            Color::Purple => "purple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Triangle,
    Square,
    Diamond,
    Pentagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Arrow(ArrowDirection),
    Check,
    Cross,
    Dot,
    Block,
    TriangleUp,
    TriangleDown,
}

impl Symbol {
    /// Arrows and check/cross first; simple trials only use those six.
    pub const ALL: [Symbol; 10] = [
        Symbol::Arrow(ArrowDirection::Up),
        Symbol::Arrow(ArrowDirection::Down),
        Symbol::Arrow(ArrowDirection::Left),
        Symbol::Arrow(ArrowDirection::Right),
        Symbol::Check,
        Symbol::Cross,
        Symbol::Dot,
        Symbol::Block,
        Symbol::TriangleUp,
        Symbol::TriangleDown,
    ];

    pub fn glyph(&self) -> char {
        match self {
            Symbol::Arrow(ArrowDirection::Up) => '↑',
            Symbol::Arrow(ArrowDirection::Down) => '↓',
            Symbol::Arrow(ArrowDirection::Left) => '←',
            Symbol::Arrow(ArrowDirection::Right) => '→',
            Symbol::Check => '✓',
            Symbol::Cross => '✗',
            Symbol::Dot => '●',
            Symbol::Block => '■',
            Symbol::TriangleUp => '▲',
            Symbol::TriangleDown => '▼',
        }
    }
}

/// Instruction prompts shown by text stimuli
pub const INSTRUCTIONS: [&str; 8] = [
    "Press space",
    "React now!",
    "Hit the target",
    "Pick red",
    "Watch the center",
    "Get ready",
    "Press the matching key",
    "Find the target",
];

/// Visual content of a simple-paradigm stimulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimpleVisual {
    /// A filled circle in one color.
    Color { color: Color, size: u32 },
    Shape {
        shape: Shape,
        color: Color,
        size: u32,
        filled: bool,
    },
    Symbol { symbol: Symbol, size: u32 },
    Text { content: String, size: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleStimulus {
    pub kind: StimulusKind,
    pub visual: SimpleVisual,
}

/// One labeled alternative, answered with the key of its slot (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: Color,
    pub slot: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceStimulus {
    pub options: Vec<ChoiceOption>,
    pub target: ChoiceOption,
    pub size: u32,
}

impl ChoiceStimulus {
    /// Maps a pressed slot key back to the option shown there.
    pub fn option_for_slot(&self, slot: u8) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.slot == slot)
    }
}

/// Attribute the subject must discriminate on in a disjunctive trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Color,
    Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub color: Color,
    pub shape: Shape,
    pub size: u32,
    pub is_target: bool,
}

impl Descriptor {
    /// True if both descriptors carry the same value on `axis`.
    pub fn matches_on(&self, other: &Descriptor, axis: Axis) -> bool {
        match axis {
            Axis::Color => self.color == other.color,
            Axis::Shape => self.shape == other.shape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisjunctiveStimulus {
    pub axis: Axis,
    pub target: Descriptor,
    pub distractors: Vec<Descriptor>,
}

impl DisjunctiveStimulus {
    /// Target first, then distractors. Layout order is the renderer's call.
    pub fn items(&self) -> impl Iterator<Item = &Descriptor> {
        std::iter::once(&self.target).chain(self.distractors.iter())
    }
}

/// A stimulus as presented for one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "paradigm", rename_all = "lowercase")]
pub enum Stimulus {
    Simple(SimpleStimulus),
    Choice(ChoiceStimulus),
    Disjunctive(DisjunctiveStimulus),
}

impl Stimulus {
    pub fn paradigm(&self) -> crate::Paradigm {
        match self {
            Stimulus::Simple(_) => crate::Paradigm::Simple,
            Stimulus::Choice(_) => crate::Paradigm::Choice,
            Stimulus::Disjunctive(_) => crate::Paradigm::Disjunctive,
        }
    }

}
