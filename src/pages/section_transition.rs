use crate::api::{PageContext, PageController, PageEvent, PageOptions, ResizePolicy};
use crate::core::{Mounted, NodeId, Sandbox};

/// Two-face section: while scrolling through the first viewport height of the
/// section, the upper face slides up and the lower face slides down to reveal
/// what lies beneath.
pub struct SectionTransitionPage {
    container_id: String,
    upper_id: String,
    lower_id: String,
    faces: Option<(NodeId, NodeId)>,
    lifted: Option<bool>,
}

impl SectionTransitionPage {
    /// Face ids conventionally end in `-a1` and `-a2`.
    #[must_use]
    pub fn new(
        container_id: impl Into<String>,
        upper_id: impl Into<String>,
        lower_id: impl Into<String>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            upper_id: upper_id.into(),
            lower_id: lower_id.into(),
            faces: None,
            lifted: None,
        }
    }

    #[must_use]
    pub fn is_lifted(&self) -> bool {
        self.lifted == Some(true)
    }
}

/// Faces lift once the section has scrolled a tenth of a viewport and settle
/// back after a full viewport.
#[must_use]
pub fn faces_lifted(progress: f64) -> bool {
    progress > 0.1 && progress < 1.0
}

fn place_faces(dom: &mut Sandbox<'_>, upper: NodeId, lower: NodeId, lifted: bool) {
    let (upper_shift, lower_shift, opacity) = if lifted {
        ("translateY(-100%)", "translateY(100%)", "0")
    } else {
        ("translateY(0)", "translateY(0)", "1")
    };
    dom.set_style(upper, "transform", upper_shift);
    dom.set_style(upper, "opacity", opacity);
    dom.set_style(lower, "transform", lower_shift);
    dom.set_style(lower, "opacity", opacity);
}

impl PageController for SectionTransitionPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn options(&self) -> PageOptions {
        PageOptions::new().with_resize(ResizePolicy::Never)
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let dom = cx.dom_ref();
        let upper = dom.require_id(&self.upper_id)?;
        let lower = dom.require_id(&self.lower_id)?;
        self.faces = Some((upper, lower));
        self.lifted = None;
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        let (PageEvent::ScrollProgress(progress), Some((upper, lower))) = (event, self.faces)
        else {
            return;
        };
        let lifted = faces_lifted(progress);
        if self.lifted == Some(lifted) {
            return;
        }
        place_faces(cx.dom(), upper, lower, lifted);
        self.lifted = Some(lifted);
    }
}
