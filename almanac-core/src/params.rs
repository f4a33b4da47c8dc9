//! Declarative construction parameters.
//!
//! Each task kind declares its configurable fields once as a static table
//! of descriptors; a single generic protocol (`TaskBuilder`) discovers,
//! validates, and transfers the values, so no editor needs per-kind wiring.
//! Tables are `const` and pre-sorted by tag; the descriptor set for a kind
//! never changes at runtime.

use thiserror::Error;

use crate::kind::KindId;
use crate::lookup::GameData;
use crate::task::Task;

/// Semantic grouping tag. Declaration order is display order: parameter
/// tables sort by tag, so `Ord` here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParameterTag {
    Item,
    Building,
    Npc,
    Count,
    Quality,
    ColorIndex,
}

/// Editing hint for the UI collaborator. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TextList,
    Stepper,
    DropDown,
    ColorButtons,
}

/// Composable validation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints(u16);

impl Constraints {
    pub const NONE: Constraints = Constraints(0);
    /// Numeric value must be >= 0.
    pub const GE0: Constraints = Constraints(1 << 0);
    /// Numeric value must be >= 1.
    pub const GE1: Constraints = Constraints(1 << 1);
    /// Collection/text value must be non-empty.
    pub const NOT_EMPTY: Constraints = Constraints(1 << 2);
    /// Entries may be known item ids.
    pub const ITEM_ID: Constraints = Constraints(1 << 3);
    /// Entries may be item category ids.
    pub const ITEM_CATEGORY: Constraints = Constraints(1 << 4);
    /// Entries may be standard object ids.
    pub const SOBJECT: Constraints = Constraints(1 << 5);
    /// Entries may be craftable item ids.
    pub const CRAFTABLE: Constraints = Constraints(1 << 6);

    const MEMBERSHIP: Constraints = Constraints::ITEM_ID
        .union(Constraints::ITEM_CATEGORY)
        .union(Constraints::SOBJECT)
        .union(Constraints::CRAFTABLE);

    pub const fn union(self, other: Constraints) -> Constraints {
        Constraints(self.0 | other.0)
    }

    pub const fn contains(self, other: Constraints) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Constraints) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Constraints {
    type Output = Constraints;

    fn bitor(self, rhs: Constraints) -> Constraints {
        self.union(rhs)
    }
}

/// Current candidate value of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Int(i32),
    Text(String),
    List(Vec<String>),
}

impl ParameterValue {
    /// "Unset" for the purposes of parent gating: empty text or list.
    /// Numbers always count as set.
    pub fn is_empty(&self) -> bool {
        match self {
            ParameterValue::Int(_) => false,
            ParameterValue::Text(text) => text.is_empty(),
            ParameterValue::List(items) => items.is_empty(),
        }
    }
}

/// One configurable field of a task kind. Immutable, type-level data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub tag: ParameterTag,
    pub constraints: Constraints,
    /// Only meaningful while the named parent parameter holds a non-empty
    /// value.
    pub parent: Option<&'static str>,
    pub input: InputKind,
}

impl ParameterDescriptor {
    pub const fn new(
        name: &'static str,
        tag: ParameterTag,
        constraints: Constraints,
        input: InputKind,
    ) -> Self {
        ParameterDescriptor {
            name,
            tag,
            constraints,
            parent: None,
            input,
        }
    }

    pub const fn with_parent(mut self, parent: &'static str) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Does `value` satisfy this descriptor's constraint bitmask?
    ///
    /// Membership flags are alternatives: every entry must pass at least
    /// one of the flags present. The engine only orchestrates the check;
    /// membership itself belongs to the lookup collaborator.
    pub fn check_value(&self, value: &ParameterValue, data: &dyn GameData) -> bool {
        let c = self.constraints;

        if c.contains(Constraints::GE0) {
            match value {
                ParameterValue::Int(n) if *n >= 0 => {}
                _ => return false,
            }
        }
        if c.contains(Constraints::GE1) {
            match value {
                ParameterValue::Int(n) if *n >= 1 => {}
                _ => return false,
            }
        }
        if c.contains(Constraints::NOT_EMPTY) && value.is_empty() {
            return false;
        }

        if c.intersects(Constraints::MEMBERSHIP) {
            let entries: Vec<&str> = match value {
                ParameterValue::List(items) => items.iter().map(String::as_str).collect(),
                ParameterValue::Text(text) if !text.is_empty() => vec![text.as_str()],
                ParameterValue::Text(_) => vec![],
                ParameterValue::Int(_) => return false,
            };

            for entry in entries {
                let ok = (c.contains(Constraints::ITEM_ID) && data.is_item_id(entry))
                    || (c.contains(Constraints::ITEM_CATEGORY) && data.is_category_id(entry))
                    || (c.contains(Constraints::SOBJECT) && data.is_object_id(entry))
                    || (c.contains(Constraints::CRAFTABLE) && data.is_craftable(entry));
                if !ok {
                    return false;
                }
            }
        }

        true
    }
}

/// Parameter names shared across kinds.
pub mod names {
    pub const ITEM: &str = "item";
    pub const BUILDING: &str = "building";
    pub const NPC: &str = "npc";
    pub const COUNT: &str = "count";
    pub const QUALITY: &str = "quality";
    pub const COLOR: &str = "color";
}

#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("parameter '{name}' expects a {expected} value")]
    WrongShape {
        name: String,
        expected: &'static str,
    },
}

/// The whole editing surface of a task kind: discover parameters, read and
/// write candidate values, validate, and finally construct.
///
/// `initialize`/`create` handle the color index generically; kinds only
/// implement their own fields (`initialize_kind`/`create_kind`).
pub trait TaskBuilder {
    fn kind(&self) -> KindId;

    /// Descriptor table, sorted by tag. Stable across calls.
    fn parameters(&self) -> &'static [ParameterDescriptor];

    fn value(&self, name: &str) -> Option<ParameterValue>;

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError>;

    fn color_index(&self) -> i32;

    fn set_color_index(&mut self, color_index: i32);

    /// Copy kind-specific fields from an existing task.
    fn initialize_kind(&mut self, task: &Task);

    /// Kind-specific construction; `None` when required values are absent.
    fn create_kind(&self, name: &str, data: &dyn GameData) -> Option<Task>;

    /// Populate the builder from an existing task (edit workflow).
    fn initialize(&mut self, task: &Task) {
        self.initialize_kind(task);
        self.set_color_index(task.color_index);
    }

    /// Construct a task, or `None` if the parameter values are
    /// insufficient. The caller keeps the edit session open on `None`.
    fn create(&self, name: &str, owner_id: i64, data: &dyn GameData) -> Option<Task> {
        let mut task = self.create_kind(name, data)?;
        task.color_index = self.color_index();
        task.owner_id = owner_id;
        Some(task)
    }

    /// A parameter whose parent is unset is exempt unless it itself
    /// requires a non-empty value.
    fn is_valid(&self, descriptor: &ParameterDescriptor, data: &dyn GameData) -> bool {
        let Some(value) = self.value(descriptor.name) else {
            return false;
        };

        if let Some(parent) = descriptor.parent {
            let parent_unset = self.value(parent).is_none_or(|v| v.is_empty());
            if parent_unset && !descriptor.constraints.contains(Constraints::NOT_EMPTY) {
                return true;
            }
        }

        descriptor.check_value(&value, data)
    }

    fn is_ready(&self, data: &dyn GameData) -> bool {
        self.parameters().iter().all(|d| self.is_valid(d, data))
    }
}
