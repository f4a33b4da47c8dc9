//! almanac-core: task lifecycle and scheduling engine for a seasonal
//! journal: renewal calendar math, the generic parameter/builder
//! construction protocol, display ordering, and legacy record migration.

pub mod builders;
pub mod calendar;
pub mod events;
pub mod kind;
pub mod lookup;
pub mod manager;
pub mod migrate;
pub mod ordering;
pub mod params;
pub mod task;

pub use builders::{
    BasicBuilder, BuildBuilder, BuyBuilder, CollectBuilder, CraftBuilder, GiftBuilder,
    SellBuilder, SmithBuilder, apply_renewal, builder_for,
};
pub use calendar::{Season, WorldDate};
pub use events::{EventBus, EventChannel, TaskEvent, TaskId};
pub use kind::{KindId, TaskKind};
pub use lookup::{BuildingEntry, GameData, GameDataTables, ItemEntry, ToolInfo};
pub use manager::TaskManager;
pub use migrate::{MigrateError, TaskDataMigrator};
pub use ordering::TaskOrdering;
pub use params::{
    Constraints, InputKind, ParameterDescriptor, ParameterError, ParameterTag, ParameterValue,
    TaskBuilder, names,
};
pub use task::{CompletionCue, RenewPeriod, SilentCue, Task};
