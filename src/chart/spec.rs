use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{DeckError, DeckResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub kind: AxisKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Axis {
    #[must_use]
    pub fn category<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: AxisKind::Category,
            name: None,
            categories: categories.into_iter().map(Into::into).collect(),
            max: None,
        }
    }

    #[must_use]
    pub fn value() -> Self {
        Self {
            kind: AxisKind::Value,
            name: None,
            categories: Vec::new(),
            max: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
    Area,
    Pie,
}

impl SeriesKind {
    #[must_use]
    pub fn is_cartesian(self) -> bool {
        !matches!(self, Self::Pie)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub data: Vec<f64>,
    #[serde(default)]
    pub y_axis_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Per-datum labels; used by pie series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SeriesKind, data: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            data,
            y_axis_index: 0,
            stack: None,
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn on_y_axis(mut self, index: usize) -> Self {
        self.y_axis_index = index;
        self
    }

    #[must_use]
    pub fn stacked(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTitle {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// Declarative configuration of one chart, built fresh for every render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<ChartTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub y_axes: SmallVec<[Axis; 2]>,
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<String>,
}

/// Structural fingerprint of a spec: axis kinds plus series kinds and axis bindings.
///
/// Two specs with the same shape can be applied as a partial update on a live
/// chart; anything else requires a full re-create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecShape {
    pub x_axis: Option<AxisKind>,
    pub y_axes: Vec<AxisKind>,
    pub series: Vec<(SeriesKind, usize)>,
}

impl ChartSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(ChartTitle {
            text: text.into(),
            subtext: None,
        });
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtext: impl Into<String>) -> Self {
        if let Some(title) = self.title.as_mut() {
            title.subtext = Some(subtext.into());
        }
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = Some(axis);
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: Axis) -> Self {
        self.y_axes.push(axis);
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.legend.push(series.name.clone());
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn shape(&self) -> SpecShape {
        SpecShape {
            x_axis: self.x_axis.as_ref().map(|axis| axis.kind),
            y_axes: self.y_axes.iter().map(|axis| axis.kind).collect(),
            series: self
                .series
                .iter()
                .map(|series| (series.kind, series.y_axis_index))
                .collect(),
        }
    }

    /// Checks internal consistency before the spec reaches a backend.
    pub fn validate(&self) -> DeckResult<()> {
        for series in &self.series {
            if series.data.iter().any(|value| !value.is_finite()) {
                return Err(DeckError::InvalidData(format!(
                    "series `{}` contains non-finite values",
                    series.name
                )));
            }
            if series.kind.is_cartesian() {
                if series.y_axis_index >= self.y_axes.len().max(1) {
                    return Err(DeckError::InvalidData(format!(
                        "series `{}` targets missing y axis {}",
                        series.name, series.y_axis_index
                    )));
                }
                if let Some(axis) = self
                    .x_axis
                    .as_ref()
                    .filter(|axis| axis.kind == AxisKind::Category)
                    .filter(|axis| !axis.categories.is_empty())
                {
                    if series.data.len() > axis.categories.len() {
                        return Err(DeckError::InvalidData(format!(
                            "series `{}` has {} values for {} categories",
                            series.name,
                            series.data.len(),
                            axis.categories.len()
                        )));
                    }
                }
            } else if !series.labels.is_empty() && series.labels.len() != series.data.len() {
                return Err(DeckError::InvalidData(format!(
                    "series `{}` has {} labels for {} values",
                    series.name,
                    series.labels.len(),
                    series.data.len()
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> DeckResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeckError::InvalidData(format!("failed to serialize chart spec: {e}")))
    }

    pub fn from_json_str(input: &str) -> DeckResult<Self> {
        let spec: Self = serde_json::from_str(input)
            .map_err(|e| DeckError::InvalidData(format!("failed to parse chart spec: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }
}
