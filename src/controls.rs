//! Declarative control descriptors and the control panel
//!
//! A demonstration registers a `(kind, label, config)` triple; the panel
//! resolves it into a concrete `Widget` (filling in defaults) and later turns
//! raw widget input into a typed `ControlValue`. Materializing widgets is the
//! host's business, see `runtime::PanelHost`.

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Default numeric range for sliders missing min/max
pub const DEFAULT_SLIDER_MIN: f64 = 0.0;
pub const DEFAULT_SLIDER_MAX: f64 = 100.0;
pub const DEFAULT_SLIDER_STEP: f64 = 1.0;

/// Position of a control within its panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(pub usize);

impl ControlId {
    /// Returned to registrars whose panel access was revoked
    pub const DETACHED: Self = Self(usize::MAX);
}

/// Widget vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Slider,
    Checkbox,
    Button,
    Select,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Slider => "slider",
            ControlKind::Checkbox => "checkbox",
            ControlKind::Button => "button",
            ControlKind::Select => "select",
        }
    }
}

/// Loosely-specified widget configuration as written by a demonstration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ControlConfig {
    pub fn range(min: f64, max: f64, step: f64, value: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}

/// Fully-resolved widget state with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Widget {
    Slider {
        min: f64,
        max: f64,
        step: f64,
        value: f64,
    },
    Checkbox {
        checked: bool,
    },
    Button,
    Select {
        options: Vec<String>,
        selected: Option<usize>,
    },
}

impl Widget {
    /// Resolve a config for the given kind, substituting defaults
    pub fn resolve(kind: ControlKind, config: &ControlConfig) -> Self {
        match kind {
            ControlKind::Slider => {
                let mut min = finite_or(config.min, DEFAULT_SLIDER_MIN);
                let mut max = finite_or(config.max, DEFAULT_SLIDER_MAX);
                if max < min {
                    std::mem::swap(&mut min, &mut max);
                }
                let step = match config.step {
                    Some(s) if s.is_finite() && s > 0.0 => s,
                    _ => DEFAULT_SLIDER_STEP,
                };
                let value = finite_or(config.value, min).clamp(min, max);
                Widget::Slider {
                    min,
                    max,
                    step,
                    value,
                }
            }
            ControlKind::Checkbox => Widget::Checkbox {
                checked: config.checked.unwrap_or(false),
            },
            ControlKind::Button => Widget::Button,
            ControlKind::Select => {
                let options = config.options.clone().unwrap_or_default();
                let selected = if options.is_empty() { None } else { Some(0) };
                Widget::Select { options, selected }
            }
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Widget::Slider { .. } => ControlKind::Slider,
            Widget::Checkbox { .. } => ControlKind::Checkbox,
            Widget::Button => ControlKind::Button,
            Widget::Select { .. } => ControlKind::Select,
        }
    }

    /// Text echoed next to a slider label
    pub fn display_value(&self) -> Option<String> {
        match self {
            Widget::Slider { value, .. } => Some(format!("{}", value)),
            _ => None,
        }
    }
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Typed value delivered to a demonstration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlValue {
    Number(f64),
    Bool(bool),
    Choice(String),
    Pressed,
}

impl ControlValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ControlValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ControlValue::Choice(s) => Some(s),
            _ => None,
        }
    }
}

/// Raw input as a host widget reports it
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetInput {
    /// The element's string value (range inputs, selects)
    Value(String),
    /// A checkbox's checked state
    Checked(bool),
    Click,
}

/// One registered control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDescriptor {
    pub id: ControlId,
    pub kind: ControlKind,
    pub label: String,
    /// Config exactly as registered
    pub config: ControlConfig,
    /// Current widget state
    pub widget: Widget,
}

impl ControlDescriptor {
    pub fn new(id: ControlId, kind: ControlKind, label: impl Into<String>, config: ControlConfig) -> Self {
        let widget = Widget::resolve(kind, &config);
        Self {
            id,
            kind,
            label: label.into(),
            config,
            widget,
        }
    }

    /// Coerce raw input into the value type this kind delivers
    ///
    /// Slider: number (clamped to range), checkbox: bool, select: one of the
    /// options, button: `Pressed`.
    pub fn coerce(&self, input: &WidgetInput) -> Result<ControlValue, ControlError> {
        match (&self.widget, input) {
            (Widget::Slider { min, max, .. }, WidgetInput::Value(raw)) => {
                let n: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ControlError::InvalidNumber(raw.clone()))?;
                if !n.is_finite() {
                    return Err(ControlError::InvalidNumber(raw.clone()));
                }
                Ok(ControlValue::Number(n.clamp(*min, *max)))
            }
            (Widget::Checkbox { .. }, WidgetInput::Checked(checked)) => Ok(ControlValue::Bool(*checked)),
            (Widget::Button, WidgetInput::Click) => Ok(ControlValue::Pressed),
            (Widget::Select { options, .. }, WidgetInput::Value(raw)) => {
                if options.iter().any(|o| o == raw) {
                    Ok(ControlValue::Choice(raw.clone()))
                } else {
                    Err(ControlError::UnknownOption(raw.clone()))
                }
            }
            _ => Err(ControlError::InputMismatch { kind: self.kind }),
        }
    }

    /// Record an accepted value in the widget state
    fn remember(&mut self, value: &ControlValue) {
        match (&mut self.widget, value) {
            (Widget::Slider { value: v, .. }, ControlValue::Number(n)) => *v = *n,
            (Widget::Checkbox { checked }, ControlValue::Bool(b)) => *checked = *b,
            (Widget::Select { options, selected }, ControlValue::Choice(choice)) => {
                *selected = options.iter().position(|o| o == choice);
            }
            _ => {}
        }
    }
}

/// Ordered list of controls for the active demonstration
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    controls: Vec<ControlDescriptor>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control. Duplicate labels are accepted but logged: label-keyed
    /// lookups (`find_by_label`) only ever see the first one.
    pub fn register(&mut self, kind: ControlKind, label: &str, config: ControlConfig) -> ControlId {
        if self.find_by_label(label).is_some() {
            log::warn!("Duplicate control label '{}' in panel", label);
        }
        let id = ControlId(self.controls.len());
        self.controls.push(ControlDescriptor::new(id, kind, label, config));
        id
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlDescriptor> {
        self.controls.get(id.0)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&ControlDescriptor> {
        self.controls.iter().find(|c| c.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlDescriptor> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn clear(&mut self) {
        self.controls.clear();
    }

    /// Coerce input for `id` and, if accepted, update the widget state
    pub fn apply(&mut self, id: ControlId, input: &WidgetInput) -> Result<ControlValue, ControlError> {
        let control = self
            .controls
            .get_mut(id.0)
            .ok_or(ControlError::UnknownControl(id))?;
        let value = control.coerce(input)?;
        control.remember(&value);
        Ok(value)
    }
}
