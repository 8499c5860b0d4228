//! Declarative rendering rules
//!
//! A [`Display`] maps each CRUD role to an ordered list of [`Rule`]s. Rules
//! serialize to tagged JSON; the admin frontend resolves each tag to a
//! template macro (a table cell renderer for list rules, an input widget for
//! form rules, and so on). The role a rule set belongs to tells the frontend
//! which macro family applies.

use crate::component::Role;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A value/title pair for select widgets and filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Choice {
    pub value: String,
    pub title: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
        }
    }
}

/// Input widget rendered for a field.
///
/// Unit widgets serialize as plain strings (`"text"`); `select` carries its
/// choice list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Text,
    TextArea,
    Number,
    Checkbox,
    DateTime,
    Json,
    Select {
        choices: Vec<Choice>,
    },
}

/// A single rendering rule.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Render one model field
    Field {
        name: String,
        label: String,
        widget: Widget,
    },
    /// Section header
    Header { text: String },
    /// Raw markup passed through to the frontend
    Html { html: String },
    /// Group of rules with an optional legend
    Fieldset {
        #[serde(skip_serializing_if = "Option::is_none")]
        legend: Option<String>,
        rules: Vec<Rule>,
    },
    /// Boxed (optionally collapsible) group of rules
    Panel {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        collapsible: bool,
        rules: Vec<Rule>,
    },
    /// Ask the frontend for an explicit confirmation (delete views)
    Confirm,
}

impl Rule {
    /// A field rule with a label humanized from the field name.
    pub fn field(name: impl Into<String>, widget: Widget) -> Self {
        let name = name.into();
        let label = humanize(&name);
        Rule::Field {
            name,
            label,
            widget,
        }
    }
}

/// A field name plus the widget it renders with. Input to scaffolding.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub widget: Widget,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, widget: Widget) -> Self {
        Self {
            name: name.into(),
            widget,
        }
    }
}

/// Per-role rule sets for one resource.
#[derive(Debug, Clone, Default)]
pub struct Display {
    rules: HashMap<Role, Vec<Rule>>,
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rules for a role, replacing any scaffolded default.
    #[must_use]
    pub fn with(mut self, role: Role, rules: Vec<Rule>) -> Self {
        self.rules.insert(role, rules);
        self
    }

    /// Rules for a role, if configured.
    pub fn rules(&self, role: Role) -> &[Rule] {
        self.rules.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Default rule sets for a list of fields.
    ///
    /// Every role renders the same field set; delete additionally carries a
    /// confirmation marker.
    pub fn scaffold(fields: &[FieldSpec]) -> Self {
        let field_rules: Vec<Rule> = fields
            .iter()
            .map(|spec| Rule::field(spec.name.clone(), spec.widget.clone()))
            .collect();
        let mut delete_rules = field_rules.clone();
        delete_rules.push(Rule::Confirm);

        Self::new()
            .with(Role::List, field_rules.clone())
            .with(Role::Create, field_rules.clone())
            .with(Role::Read, field_rules.clone())
            .with(Role::Update, field_rules)
            .with(Role::Delete, delete_rules)
    }
}

/// Turn a field or table name into a display label (`"kind_id"` -> `"Kind Id"`).
pub fn humanize(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
