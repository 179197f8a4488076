//! Field registry: the static declaration of each role's wizard.
//!
//! A `WizardDefinition` is an ordered list of `Step`s. Every step owns its
//! fields and the declarative rules the validator runs against the draft.
//! Definitions are checked once when they are built; a bad definition is a
//! `ConfigError`, never a mid-flow failure.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use super::definitions;
use crate::error::ConfigError;

/// The party going through onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            _ => Err(ConfigError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input kind of a field. Decides which `Value` shape the draft may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Date,
    Numeric,
    Select,
    MultiSelect,
    Checkbox,
    File,
}

impl FieldKind {
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Checkbox => "checkbox",
            Self::File => "file",
        };
        write!(f, "{s}")
    }
}

/// Declaration of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Allowed values for select kinds, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Hidden on screen and in the review summary (passwords, card numbers).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub masked: bool,
    /// Accepted media types for file fields, e.g. `image/*`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            options: Vec::new(),
            masked: false,
            accept: None,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn numeric(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Numeric)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    pub fn multi_select(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::new(name, label, FieldKind::MultiSelect)
        }
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn file(name: &str, label: &str, accept: &str) -> Self {
        Self {
            accept: Some(accept.to_string()),
            ..Self::new(name, label, FieldKind::File)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

/// A declarative validation rule attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Every field of the step marked `required` must hold a non-empty value.
    Required { message: String },
    /// Two fields must hold identical text.
    Equal {
        left: String,
        right: String,
        message: String,
    },
    /// Every named checkbox must be ticked.
    AllChecked {
        fields: Vec<String>,
        message: String,
    },
}

impl Rule {
    pub fn required(message: &str) -> Self {
        Self::Required {
            message: message.to_string(),
        }
    }

    pub fn equal(left: &str, right: &str, message: &str) -> Self {
        Self::Equal {
            left: left.to_string(),
            right: right.to_string(),
            message: message.to_string(),
        }
    }

    pub fn all_checked(fields: &[&str], message: &str) -> Self {
        Self::AllChecked {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.to_string(),
        }
    }

    /// Evaluation rank: required, then equality, then all-checked.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Required { .. } => 0,
            Self::Equal { .. } => 1,
            Self::AllChecked { .. } => 2,
        }
    }

    fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Self::Required { .. } => Vec::new(),
            Self::Equal { left, right, .. } => vec![left.as_str(), right.as_str()],
            Self::AllChecked { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }
}

/// One page of a wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub index: usize,
    /// Short label shown in the step list.
    pub label: String,
    /// Section heading shown above the fields.
    pub title: String,
    pub fields: Vec<FieldSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

impl Step {
    pub fn new(label: &str, title: &str) -> Self {
        Self {
            index: 0,
            label: label.to_string(),
            title: title.to_string(),
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// The full, immutable wizard for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardDefinition {
    pub role: Role,
    pub title: String,
    /// Path of the onboarding submission endpoint, relative to the API base.
    pub endpoint: String,
    pub steps: Vec<Step>,
}

impl WizardDefinition {
    /// Build a definition, numbering the steps and checking field names and
    /// rule references.
    pub fn new(
        role: Role,
        title: &str,
        endpoint: &str,
        steps: Vec<Step>,
    ) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptyWizard {
                role: role.to_string(),
            });
        }

        let steps: Vec<Step> = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| Step { index, ..step })
            .collect();

        let mut seen: HashMap<&str, &FieldSpec> = HashMap::new();
        for step in &steps {
            let mut in_step = HashSet::new();
            for field in &step.fields {
                if !in_step.insert(field.name.as_str()) {
                    return Err(ConfigError::DuplicateField {
                        role: role.to_string(),
                        step: step.label.clone(),
                        field: field.name.clone(),
                    });
                }
                // Reuse across steps is only allowed for an identical declaration.
                if let Some(earlier) = seen.insert(field.name.as_str(), field)
                    && earlier != field
                {
                    return Err(ConfigError::ConflictingField {
                        role: role.to_string(),
                        field: field.name.clone(),
                    });
                }
            }
            for rule in &step.rules {
                for name in rule.referenced_fields() {
                    if step.field_spec(name).is_none() {
                        return Err(ConfigError::UnknownRuleField {
                            step: step.label.clone(),
                            field: name.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            role,
            title: title.to_string(),
            endpoint: endpoint.to_string(),
            steps,
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Look a field up anywhere in the wizard.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps.iter().find_map(|s| s.field_spec(name))
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }
}

static PATIENT: LazyLock<Result<Arc<WizardDefinition>, ConfigError>> =
    LazyLock::new(|| definitions::patient().map(Arc::new));

static DOCTOR: LazyLock<Result<Arc<WizardDefinition>, ConfigError>> =
    LazyLock::new(|| definitions::doctor().map(Arc::new));

/// The shared wizard definition for a role.
pub fn definition(role: Role) -> Result<Arc<WizardDefinition>, ConfigError> {
    let slot = match role {
        Role::Patient => &*PATIENT,
        Role::Doctor => &*DOCTOR,
    };
    slot.clone()
}

/// Ordered steps of the wizard for a role given as text.
pub fn get_steps(role: &str) -> Result<Vec<Step>, ConfigError> {
    let role: Role = role.parse()?;
    Ok(definition(role)?.steps.clone())
}
