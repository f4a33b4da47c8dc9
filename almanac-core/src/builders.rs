//! One builder per task kind, plus the registry.
//!
//! Builders are transient edit sessions: hold candidate values, validate
//! against the kind's descriptor table, and produce a task (or decline).
//! Descriptor tables are `const`, declared in tag order.

use crate::calendar::WorldDate;
use crate::kind::{KindId, TaskKind};
use crate::lookup::GameData;
use crate::params::{
    Constraints, InputKind, ParameterDescriptor, ParameterError, ParameterTag, ParameterValue,
    TaskBuilder, names,
};
use crate::task::Task;

const ITEM_IDS: Constraints = Constraints::ITEM_ID
    .union(Constraints::ITEM_CATEGORY)
    .union(Constraints::NOT_EMPTY);
const OBJECT_IDS: Constraints = Constraints::SOBJECT
    .union(Constraints::ITEM_CATEGORY)
    .union(Constraints::NOT_EMPTY);
const OPTIONAL_ITEM_IDS: Constraints = Constraints::ITEM_ID.union(Constraints::ITEM_CATEGORY);
const CRAFTABLE_IDS: Constraints = Constraints::CRAFTABLE.union(Constraints::NOT_EMPTY);

const COLOR_PARAM: ParameterDescriptor = ParameterDescriptor::new(
    names::COLOR,
    ParameterTag::ColorIndex,
    Constraints::GE0,
    InputKind::ColorButtons,
);
const COUNT_PARAM: ParameterDescriptor = ParameterDescriptor::new(
    names::COUNT,
    ParameterTag::Count,
    Constraints::GE1,
    InputKind::Stepper,
);

/// Edit session for the kind's registry entry.
pub fn builder_for(kind: KindId) -> Box<dyn TaskBuilder> {
    match kind {
        KindId::Basic => Box::new(BasicBuilder::default()),
        KindId::Collect => Box::new(CollectBuilder::default()),
        KindId::Craft => Box::new(CraftBuilder::default()),
        KindId::Buy => Box::new(BuyBuilder::default()),
        KindId::Sell => Box::new(SellBuilder::default()),
        KindId::Build => Box::new(BuildBuilder::default()),
        KindId::Smith => Box::new(SmithBuilder::default()),
        KindId::Gift => Box::new(GiftBuilder::default()),
    }
}

fn expect_int(name: &str, value: ParameterValue) -> Result<i32, ParameterError> {
    match value {
        ParameterValue::Int(n) => Ok(n),
        _ => Err(ParameterError::WrongShape {
            name: name.to_string(),
            expected: "numeric",
        }),
    }
}

fn expect_text(name: &str, value: ParameterValue) -> Result<String, ParameterError> {
    match value {
        ParameterValue::Text(text) => Ok(text),
        _ => Err(ParameterError::WrongShape {
            name: name.to_string(),
            expected: "text",
        }),
    }
}

fn expect_list(name: &str, value: ParameterValue) -> Result<Vec<String>, ParameterError> {
    match value {
        ParameterValue::List(items) => Ok(items),
        _ => Err(ParameterError::WrongShape {
            name: name.to_string(),
            expected: "list",
        }),
    }
}

fn unknown(name: &str) -> ParameterError {
    ParameterError::UnknownParameter(name.to_string())
}

// ---------------------------------------------------------------------------
// Basic

#[derive(Debug, Default)]
pub struct BasicBuilder {
    color_index: i32,
}

const BASIC_PARAMS: &[ParameterDescriptor] = &[COLOR_PARAM];

impl TaskBuilder for BasicBuilder {
    fn kind(&self) -> KindId {
        KindId::Basic
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        BASIC_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::COLOR => {
                self.color_index = expect_int(name, value)?;
                Ok(())
            }
            _ => Err(unknown(name)),
        }
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, _task: &Task) {}

    fn create_kind(&self, name: &str, _data: &dyn GameData) -> Option<Task> {
        Some(Task::new(TaskKind::Basic, name))
    }
}

// ---------------------------------------------------------------------------
// Collect

#[derive(Debug)]
pub struct CollectBuilder {
    pub item_ids: Vec<String>,
    pub count: i32,
    pub quality: i32,
    color_index: i32,
}

impl Default for CollectBuilder {
    fn default() -> Self {
        CollectBuilder {
            item_ids: Vec::new(),
            count: 1,
            quality: 0,
            color_index: 0,
        }
    }
}

const COLLECT_PARAMS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(names::ITEM, ParameterTag::Item, OBJECT_IDS, InputKind::TextList),
    COUNT_PARAM,
    ParameterDescriptor::new(
        names::QUALITY,
        ParameterTag::Quality,
        Constraints::GE0,
        InputKind::DropDown,
    )
    .with_parent(names::ITEM),
    COLOR_PARAM,
];

impl TaskBuilder for CollectBuilder {
    fn kind(&self) -> KindId {
        KindId::Collect
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        COLLECT_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::ITEM => Some(ParameterValue::List(self.item_ids.clone())),
            names::COUNT => Some(ParameterValue::Int(self.count)),
            names::QUALITY => Some(ParameterValue::Int(self.quality)),
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::ITEM => self.item_ids = expect_list(name, value)?,
            names::COUNT => self.count = expect_int(name, value)?,
            names::QUALITY => self.quality = expect_int(name, value)?,
            names::COLOR => self.color_index = expect_int(name, value)?,
            _ => return Err(unknown(name)),
        }
        Ok(())
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, task: &Task) {
        if let TaskKind::Collect { item_ids, quality } = task.kind() {
            self.item_ids = item_ids.clone();
            self.quality = *quality;
            self.count = task.max_count;
        }
    }

    fn create_kind(&self, name: &str, _data: &dyn GameData) -> Option<Task> {
        if self.item_ids.is_empty() {
            return None;
        }
        Some(
            Task::new(
                TaskKind::Collect {
                    item_ids: self.item_ids.clone(),
                    quality: self.quality,
                },
                name,
            )
            .with_max_count(self.count.max(1)),
        )
    }
}

// ---------------------------------------------------------------------------
// Craft

#[derive(Debug)]
pub struct CraftBuilder {
    pub item_ids: Vec<String>,
    pub count: i32,
    color_index: i32,
}

impl Default for CraftBuilder {
    fn default() -> Self {
        CraftBuilder {
            item_ids: Vec::new(),
            count: 1,
            color_index: 0,
        }
    }
}

const CRAFT_PARAMS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(names::ITEM, ParameterTag::Item, CRAFTABLE_IDS, InputKind::TextList),
    COUNT_PARAM,
    COLOR_PARAM,
];

impl TaskBuilder for CraftBuilder {
    fn kind(&self) -> KindId {
        KindId::Craft
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        CRAFT_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::ITEM => Some(ParameterValue::List(self.item_ids.clone())),
            names::COUNT => Some(ParameterValue::Int(self.count)),
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::ITEM => self.item_ids = expect_list(name, value)?,
            names::COUNT => self.count = expect_int(name, value)?,
            names::COLOR => self.color_index = expect_int(name, value)?,
            _ => return Err(unknown(name)),
        }
        Ok(())
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, task: &Task) {
        if let TaskKind::Craft { item_ids } = task.kind() {
            self.item_ids = item_ids.clone();
            self.count = task.max_count;
        }
    }

    fn create_kind(&self, name: &str, _data: &dyn GameData) -> Option<Task> {
        if self.item_ids.is_empty() {
            return None;
        }
        Some(
            Task::new(
                TaskKind::Craft {
                    item_ids: self.item_ids.clone(),
                },
                name,
            )
            .with_max_count(self.count.max(1)),
        )
    }
}

// ---------------------------------------------------------------------------
// Buy and Sell share a shape; only the kind and event differ.

macro_rules! trade_builder {
    ($builder:ident, $kind_id:ident, $variant:ident) => {
        #[derive(Debug)]
        pub struct $builder {
            pub item_ids: Vec<String>,
            pub count: i32,
            color_index: i32,
        }

        impl Default for $builder {
            fn default() -> Self {
                $builder {
                    item_ids: Vec::new(),
                    count: 1,
                    color_index: 0,
                }
            }
        }

        impl TaskBuilder for $builder {
            fn kind(&self) -> KindId {
                KindId::$kind_id
            }

            fn parameters(&self) -> &'static [ParameterDescriptor] {
                TRADE_PARAMS
            }

            fn value(&self, name: &str) -> Option<ParameterValue> {
                match name {
                    names::ITEM => Some(ParameterValue::List(self.item_ids.clone())),
                    names::COUNT => Some(ParameterValue::Int(self.count)),
                    names::COLOR => Some(ParameterValue::Int(self.color_index)),
                    _ => None,
                }
            }

            fn set_value(
                &mut self,
                name: &str,
                value: ParameterValue,
            ) -> Result<(), ParameterError> {
                match name {
                    names::ITEM => self.item_ids = expect_list(name, value)?,
                    names::COUNT => self.count = expect_int(name, value)?,
                    names::COLOR => self.color_index = expect_int(name, value)?,
                    _ => return Err(unknown(name)),
                }
                Ok(())
            }

            fn color_index(&self) -> i32 {
                self.color_index
            }

            fn set_color_index(&mut self, color_index: i32) {
                self.color_index = color_index;
            }

            fn initialize_kind(&mut self, task: &Task) {
                if let TaskKind::$variant { item_ids } = task.kind() {
                    self.item_ids = item_ids.clone();
                    self.count = task.max_count;
                }
            }

            fn create_kind(&self, name: &str, data: &dyn GameData) -> Option<Task> {
                let first = self.item_ids.first()?;
                let base_price = data.item_price(first).unwrap_or(0);
                Some(
                    Task::new(
                        TaskKind::$variant {
                            item_ids: self.item_ids.clone(),
                        },
                        name,
                    )
                    .with_max_count(self.count.max(1))
                    .with_base_price(base_price),
                )
            }
        }
    };
}

const TRADE_PARAMS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(names::ITEM, ParameterTag::Item, ITEM_IDS, InputKind::TextList),
    COUNT_PARAM,
    COLOR_PARAM,
];

trade_builder!(BuyBuilder, Buy, Buy);
trade_builder!(SellBuilder, Sell, Sell);

// ---------------------------------------------------------------------------
// Build

#[derive(Debug)]
pub struct BuildBuilder {
    pub building_type: String,
    pub count: i32,
    color_index: i32,
}

impl Default for BuildBuilder {
    fn default() -> Self {
        BuildBuilder {
            building_type: String::new(),
            count: 1,
            color_index: 0,
        }
    }
}

const BUILD_PARAMS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(
        names::BUILDING,
        ParameterTag::Building,
        Constraints::NOT_EMPTY,
        InputKind::DropDown,
    ),
    COUNT_PARAM,
    COLOR_PARAM,
];

impl TaskBuilder for BuildBuilder {
    fn kind(&self) -> KindId {
        KindId::Build
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        BUILD_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::BUILDING => Some(ParameterValue::Text(self.building_type.clone())),
            names::COUNT => Some(ParameterValue::Int(self.count)),
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::BUILDING => self.building_type = expect_text(name, value)?,
            names::COUNT => self.count = expect_int(name, value)?,
            names::COLOR => self.color_index = expect_int(name, value)?,
            _ => return Err(unknown(name)),
        }
        Ok(())
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, task: &Task) {
        if let TaskKind::Build { building_type } = task.kind() {
            self.building_type = building_type.clone();
            self.count = task.max_count;
        }
    }

    fn create_kind(&self, name: &str, data: &dyn GameData) -> Option<Task> {
        if self.building_type.is_empty() {
            return None;
        }
        let base_price = data.building_cost(&self.building_type).unwrap_or(0);
        Some(
            Task::new(
                TaskKind::Build {
                    building_type: self.building_type.clone(),
                },
                name,
            )
            .with_max_count(self.count.max(1))
            .with_base_price(base_price),
        )
    }
}

// ---------------------------------------------------------------------------
// Smith

#[derive(Debug, Default)]
pub struct SmithBuilder {
    pub item_id: String,
    color_index: i32,
}

const SMITH_PARAMS: &[ParameterDescriptor] = &[
    ParameterDescriptor::new(
        names::ITEM,
        ParameterTag::Item,
        Constraints::ITEM_ID.union(Constraints::NOT_EMPTY),
        InputKind::DropDown,
    ),
    COLOR_PARAM,
];

impl TaskBuilder for SmithBuilder {
    fn kind(&self) -> KindId {
        KindId::Smith
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        SMITH_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::ITEM => Some(ParameterValue::Text(self.item_id.clone())),
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::ITEM => self.item_id = expect_text(name, value)?,
            names::COLOR => self.color_index = expect_int(name, value)?,
            _ => return Err(unknown(name)),
        }
        Ok(())
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, task: &Task) {
        if let TaskKind::Smith { item_id, .. } = task.kind() {
            self.item_id = item_id.clone();
        }
    }

    fn create_kind(&self, name: &str, data: &dyn GameData) -> Option<Task> {
        if self.item_id.is_empty() {
            return None;
        }
        let (tool_type, upgrade_level) = match data.tool_info(&self.item_id) {
            Some(info) => (info.class_name, info.upgrade_level),
            None => (String::new(), 0),
        };
        let base_price = data.item_price(&self.item_id).unwrap_or(0);
        Some(
            Task::new(
                TaskKind::Smith {
                    item_id: self.item_id.clone(),
                    tool_type,
                    upgrade_level,
                },
                name,
            )
            .with_base_price(base_price),
        )
    }
}

// ---------------------------------------------------------------------------
// Gift

#[derive(Debug)]
pub struct GiftBuilder {
    pub npc_name: String,
    pub item_ids: Vec<String>,
    pub count: i32,
    color_index: i32,
}

impl Default for GiftBuilder {
    fn default() -> Self {
        GiftBuilder {
            npc_name: String::new(),
            item_ids: Vec::new(),
            count: 1,
            color_index: 0,
        }
    }
}

const GIFT_PARAMS: &[ParameterDescriptor] = &[
    // The item filter is optional; it only narrows which gifts count.
    ParameterDescriptor::new(
        names::ITEM,
        ParameterTag::Item,
        OPTIONAL_ITEM_IDS,
        InputKind::TextList,
    ),
    ParameterDescriptor::new(
        names::NPC,
        ParameterTag::Npc,
        Constraints::NOT_EMPTY,
        InputKind::DropDown,
    ),
    COUNT_PARAM,
    COLOR_PARAM,
];

impl TaskBuilder for GiftBuilder {
    fn kind(&self) -> KindId {
        KindId::Gift
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        GIFT_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        match name {
            names::ITEM => Some(ParameterValue::List(self.item_ids.clone())),
            names::NPC => Some(ParameterValue::Text(self.npc_name.clone())),
            names::COUNT => Some(ParameterValue::Int(self.count)),
            names::COLOR => Some(ParameterValue::Int(self.color_index)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match name {
            names::ITEM => self.item_ids = expect_list(name, value)?,
            names::NPC => self.npc_name = expect_text(name, value)?,
            names::COUNT => self.count = expect_int(name, value)?,
            names::COLOR => self.color_index = expect_int(name, value)?,
            _ => return Err(unknown(name)),
        }
        Ok(())
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn set_color_index(&mut self, color_index: i32) {
        self.color_index = color_index;
    }

    fn initialize_kind(&mut self, task: &Task) {
        if let TaskKind::Gift { npc_name, item_ids } = task.kind() {
            self.npc_name = npc_name.clone();
            self.item_ids = item_ids.clone();
            self.count = task.max_count;
        }
    }

    fn create_kind(&self, name: &str, _data: &dyn GameData) -> Option<Task> {
        if self.npc_name.is_empty() {
            return None;
        }
        Some(
            Task::new(
                TaskKind::Gift {
                    npc_name: self.npc_name.clone(),
                    item_ids: self.item_ids.clone(),
                },
                name,
            )
            .with_max_count(self.count.max(1)),
        )
    }
}

/// Anchor a freshly created task's renewal schedule at its creation date.
/// Builders stay date-free; callers that want recurrence apply it here.
pub fn apply_renewal(task: &mut Task, period: crate::task::RenewPeriod, today: WorldDate, interval: i32) {
    task.renew_period = period;
    task.renew_date = today;
    task.renew_custom_interval = interval.max(1);
}
