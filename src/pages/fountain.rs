//! The "answer" finale shared by the scene pager and its stand-alone replay
//! page: thought bubbles fade, the solution path draws, then a burst of
//! thumbs-up particles rises out of the fountain node.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::AnimationSequence;
use crate::core::{Element, Missing, NodeId, Sandbox};

pub const BUBBLE_CLASS: &str = "thought-bubble";
pub const PATH_ID: &str = "solution-path";
pub const FOUNTAIN_ID: &str = "thumbs-up-fountain";
pub const PARTICLE_CLASS: &str = "thumb";
pub const PARTICLE_COUNT: usize = 40;

const FADE_AT: Duration = Duration::from_millis(2_800);
const PATH_AT: Duration = Duration::from_millis(3_000);
const BURST_AT: Duration = Duration::from_millis(3_800);

/// Nodes the finale animates, resolved inside one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FountainNodes {
    pub bubbles: Vec<NodeId>,
    pub path: NodeId,
    pub fountain: NodeId,
}

impl FountainNodes {
    pub fn locate(dom: &Sandbox<'_>, scope: NodeId) -> Result<Self, Missing> {
        let path = dom.require_id(PATH_ID)?;
        let fountain = dom.require_id(FOUNTAIN_ID)?;
        Ok(Self {
            bubbles: dom.find_class_in(scope, BUBBLE_CLASS),
            path,
            fountain,
        })
    }
}

/// Builds the finale sequence; its reset reverts every class it sets and
/// removes the particles.
#[must_use]
pub fn finale_sequence(nodes: &FountainNodes, seed: u64) -> AnimationSequence {
    let fade = nodes.bubbles.clone();
    let reset_bubbles = nodes.bubbles.clone();
    let path = nodes.path;
    let fountain = nodes.fountain;
    AnimationSequence::new()
        .at(FADE_AT, move |dom| {
            for bubble in &fade {
                dom.add_class(*bubble, "is-fading");
            }
        })
        .at(PATH_AT, move |dom| {
            dom.add_class(path, "is-active");
        })
        .at(BURST_AT, move |dom| {
            burst(dom, fountain, seed);
        })
        .on_reset(move |dom| {
            for bubble in &reset_bubbles {
                dom.remove_class(*bubble, "is-fading");
            }
            dom.remove_class(path, "is-active");
            dom.clear_children(fountain);
        })
}

/// Appends [`PARTICLE_COUNT`] particles with random end transforms and timings.
pub fn burst(dom: &mut Sandbox<'_>, fountain: NodeId, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut spawned = 0;
    for _ in 0..PARTICLE_COUNT {
        let x_end: f64 = rng.gen_range(-200.0..200.0);
        let y_end: f64 = -rng.gen_range(150.0..350.0);
        let rotation: f64 = rng.gen_range(-45.0..45.0);
        let duration: f64 = rng.gen_range(1.5..3.5);
        let delay: f64 = rng.gen_range(0.0..0.5);
        let particle = Element::new("div")
            .with_class(PARTICLE_CLASS)
            .with_text("\u{1F44D}")
            .with_style(
                "--transform-end",
                format!("translate({x_end:.1}px, {y_end:.1}px) rotate({rotation:.1}deg)"),
            )
            .with_style(
                "animation",
                format!("fountain-rise {duration:.2}s {delay:.2}s ease-out forwards"),
            );
        if dom.append(fountain, particle).is_some() {
            spawned += 1;
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Document;

    fn fountain_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let page = doc
            .append(root, Element::new("section").with_id("page-finale"))
            .expect("page");
        let fountain = doc
            .append(page, Element::new("div").with_id(FOUNTAIN_ID))
            .expect("fountain");
        (doc, page, fountain)
    }

    #[test]
    fn burst_spawns_styled_particles() {
        let (mut doc, page, fountain) = fountain_doc();
        let mut dom = Sandbox::new(&mut doc, page);
        assert_eq!(burst(&mut dom, fountain, 7), PARTICLE_COUNT);

        let particles = dom.find_class_in(fountain, PARTICLE_CLASS);
        assert_eq!(particles.len(), PARTICLE_COUNT);
        for particle in particles {
            let transform = dom.style(particle, "--transform-end").expect("transform");
            assert!(transform.starts_with("translate("));
            let animation = dom.style(particle, "animation").expect("animation");
            assert!(animation.starts_with("fountain-rise "));
        }
    }

    #[test]
    fn same_seed_gives_same_burst() {
        let render = |seed: u64| {
            let (mut doc, page, fountain) = fountain_doc();
            let mut dom = Sandbox::new(&mut doc, page);
            burst(&mut dom, fountain, seed);
            dom.snapshot().expect("snapshot")
        };
        assert_eq!(render(42), render(42));
        assert_ne!(render(42), render(43));
    }

    #[test]
    fn burst_outside_scope_is_refused() {
        let (mut doc, _page, fountain) = fountain_doc();
        let root = doc.root();
        let other = doc
            .append(root, Element::new("section").with_id("page-other"))
            .expect("other");
        let mut dom = Sandbox::new(&mut doc, other);
        assert_eq!(burst(&mut dom, fountain, 7), 0);
        assert!(doc.children(fountain).is_empty());
    }
}
