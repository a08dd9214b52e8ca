//! Stimulus generation per paradigm.
//!
//! Every draw comes from the high-contrast part of the vocabulary: the first
//! four palette colors, the first three or four shapes, the first six symbols
//! and the first three instruction texts.

use rand::Rng;
use rand::seq::SliceRandom;
use rtlab_core::{
    Axis, ChoiceOption, ChoiceStimulus, Color, Descriptor, DisjunctiveStimulus, INSTRUCTIONS,
    Paradigm, Shape, SimpleStimulus, SimpleVisual, Stimulus, StimulusKind, Symbol,
};

const SIMPLE_SIZES: [u32; 3] = [60, 80, 100];
const GLYPH_SIZE: u32 = 80;
const ITEM_SIZE: u32 = 60;

const SIMPLE_SHAPES: [Shape; 4] = [Shape::Circle, Shape::Triangle, Shape::Square, Shape::Diamond];
const SIMPLE_SYMBOLS: [Symbol; 6] = [
    Symbol::ALL[0],
    Symbol::ALL[1],
    Symbol::ALL[2],
    Symbol::ALL[3],
    Symbol::ALL[4],
    Symbol::ALL[5],
];
const SIMPLE_TEXTS: [&str; 3] = [INSTRUCTIONS[0], INSTRUCTIONS[1], INSTRUCTIONS[2]];

/// Shapes carried by color-discriminated disjunctive items.
const COLOR_AXIS_SHAPES: [Shape; 3] = [Shape::Circle, Shape::Triangle, Shape::Square];
/// Shapes a shape-discriminated disjunctive item can take.
const SHAPE_AXIS_SHAPES: [Shape; 4] = SIMPLE_SHAPES;

pub const MIN_DISTRACTORS: usize = 3;
pub const MAX_DISTRACTORS: usize = 6;
pub const CHOICE_OPTIONS: usize = 4;

/// Pure generator of per-trial stimuli
#[derive(Debug, Clone, Copy, Default)]
pub struct StimulusCatalog;

impl StimulusCatalog {
    pub fn generate<R: Rng + ?Sized>(
        paradigm: Paradigm,
        kind: StimulusKind,
        rng: &mut R,
    ) -> Stimulus {
        match paradigm {
            Paradigm::Simple => Stimulus::Simple(Self::simple(kind, rng)),
            Paradigm::Choice => Stimulus::Choice(Self::choice(rng)),
            Paradigm::Disjunctive => {
                let axis = if rng.random_bool(0.5) {
                    Axis::Color
                } else {
                    Axis::Shape
                };
                Stimulus::Disjunctive(Self::disjunctive(axis, rng))
            }
        }
    }

    pub fn simple<R: Rng + ?Sized>(kind: StimulusKind, rng: &mut R) -> SimpleStimulus {
        let visual = match kind {
            StimulusKind::Color => SimpleVisual::Color {
                color: pick(rng, &Color::HIGH_CONTRAST),
                size: pick(rng, &SIMPLE_SIZES),
            },
            StimulusKind::Shape => SimpleVisual::Shape {
                shape: pick(rng, &SIMPLE_SHAPES),
                color: pick(rng, &Color::HIGH_CONTRAST),
                size: pick(rng, &SIMPLE_SIZES),
                filled: rng.random_bool(0.5),
            },
            StimulusKind::Symbol => SimpleVisual::Symbol {
                symbol: pick(rng, &SIMPLE_SYMBOLS),
                size: GLYPH_SIZE,
            },
            StimulusKind::Text => SimpleVisual::Text {
                content: pick(rng, &SIMPLE_TEXTS).to_string(),
                size: GLYPH_SIZE,
            },
        };
        SimpleStimulus { kind, visual }
    }

    /// Four distinct color labels in random slot order, one of them the target.
    pub fn choice<R: Rng + ?Sized>(rng: &mut R) -> ChoiceStimulus {
        let mut labels = Color::HIGH_CONTRAST;
        labels.shuffle(rng);
        let options: Vec<ChoiceOption> = labels
            .iter()
            .zip(1u8..)
            .map(|(&label, slot)| ChoiceOption { label, slot })
            .collect();
        let target = options[rng.random_range(0..options.len())];
        ChoiceStimulus {
            options,
            target,
            size: ITEM_SIZE,
        }
    }

    /// A target plus 3 to 6 distractors that never share its value on `axis`.
    pub fn disjunctive<R: Rng + ?Sized>(axis: Axis, rng: &mut R) -> DisjunctiveStimulus {
        let target = match axis {
            Axis::Color => descriptor(
                pick(rng, &Color::HIGH_CONTRAST),
                pick(rng, &COLOR_AXIS_SHAPES),
                true,
            ),
            Axis::Shape => descriptor(
                pick(rng, &Color::HIGH_CONTRAST),
                pick(rng, &SHAPE_AXIS_SHAPES),
                true,
            ),
        };

        let count = rng.random_range(MIN_DISTRACTORS..=MAX_DISTRACTORS);
        let distractors = (0..count)
            .map(|_| match axis {
                Axis::Color => {
                    let colors: Vec<Color> = Color::HIGH_CONTRAST
                        .into_iter()
                        .filter(|c| *c != target.color)
                        .collect();
                    descriptor(pick(rng, &colors), pick(rng, &COLOR_AXIS_SHAPES), false)
                }
                Axis::Shape => {
                    let shapes: Vec<Shape> = SHAPE_AXIS_SHAPES
                        .into_iter()
                        .filter(|s| *s != target.shape)
                        .collect();
                    descriptor(pick(rng, &Color::HIGH_CONTRAST), pick(rng, &shapes), false)
                }
            })
            .collect();

        DisjunctiveStimulus {
            axis,
            target,
            distractors,
        }
    }
}

fn descriptor(color: Color, shape: Shape, is_target: bool) -> Descriptor {
    Descriptor {
        color,
        shape,
        size: ITEM_SIZE,
        is_target,
    }
}

/// `items` is always one of the non-empty vocabulary slices above.
fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn simple_color_stays_in_high_contrast_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let stim = StimulusCatalog::simple(StimulusKind::Color, &mut rng);
            match stim.visual {
                SimpleVisual::Color { color, size } => {
                    assert!(Color::HIGH_CONTRAST.contains(&color));
                    assert!(SIMPLE_SIZES.contains(&size));
                }
                other => panic!("unexpected visual {other:?}"),
            }
        }
    }

    #[test]
    fn simple_kinds_draw_from_restricted_vocabulary() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            match StimulusCatalog::simple(StimulusKind::Shape, &mut rng).visual {
                SimpleVisual::Shape { shape, color, .. } => {
                    assert_ne!(shape, Shape::Pentagon);
                    assert!(Color::HIGH_CONTRAST.contains(&color));
                }
                other => panic!("unexpected visual {other:?}"),
            }
            match StimulusCatalog::simple(StimulusKind::Symbol, &mut rng).visual {
                SimpleVisual::Symbol { symbol, .. } => assert!(SIMPLE_SYMBOLS.contains(&symbol)),
                other => panic!("unexpected visual {other:?}"),
            }
            match StimulusCatalog::simple(StimulusKind::Text, &mut rng).visual {
                SimpleVisual::Text { content, .. } => {
                    assert!(SIMPLE_TEXTS.contains(&content.as_str()))
                }
                other => panic!("unexpected visual {other:?}"),
            }
        }
    }

    #[test]
    fn generate_tags_stimulus_with_paradigm() {
        let mut rng = StdRng::seed_from_u64(3);
        for paradigm in Paradigm::ALL {
            let stim = StimulusCatalog::generate(paradigm, StimulusKind::Text, &mut rng);
            assert_eq!(stim.paradigm(), paradigm);
        }
    }

    #[test]
    fn same_seed_same_stimulus() {
        let a = StimulusCatalog::generate(
            Paradigm::Disjunctive,
            StimulusKind::Color,
            &mut StdRng::seed_from_u64(42),
        );
        let b = StimulusCatalog::generate(
            Paradigm::Disjunctive,
            StimulusKind::Color,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(a, b);
    }
}
