//! Reference page controllers.
//!
//! Each one drives a single container of a deck document and exercises a
//! different slice of the runtime: input capture and pagination, replay on
//! visibility, staged timelines with count-ups, chart switching, signals and
//! scroll-linked transitions.

pub mod fountain;
pub mod replay_on_entry;
pub mod scene_pager;
pub mod section_transition;
pub mod sidebar_chart;
pub mod staged_reveal;
pub mod tabbed_chart;

pub use fountain::{FountainNodes, burst, finale_sequence};
pub use replay_on_entry::ReplayOnEntryPage;
pub use scene_pager::ScenePagerPage;
pub use section_transition::{SectionTransitionPage, faces_lifted};
pub use sidebar_chart::SidebarChartPage;
pub use staged_reveal::{ShareColumn, StagedRevealPage, catalog_growth, new_listings_by_class};
pub use tabbed_chart::{ChartView, TabbedChartPage, batch_sales_spec, batch_share_spec};
