//! Structural schema helpers
//!
//! The API server only accepts structural schemas: every field carries a
//! `type`, and `anyOf` branches may not set `type`, `description` or
//! `nullable`. schemars renders `Option<Enum>` as an `anyOf` with a null
//! branch, so optional enum fields use these flat schemas instead.

use schemars::{Schema, SchemaGenerator, json_schema};

use crate::conditions::CONDITION_SEVERITIES;
use crate::managed_machine_pool::DiskType;
use crate::scaling::LOCATION_POLICIES;

/// `{type: string, enum: [...]}`
pub(crate) fn string_enum<'a>(values: impl IntoIterator<Item = &'a str>) -> Schema {
    let values: Vec<&str> = values.into_iter().collect();
    json_schema!({
        "type": "string",
        "enum": values,
    })
}

/// `{type: string, enum: [...], nullable: true}`
pub(crate) fn nullable_string_enum<'a>(values: impl IntoIterator<Item = &'a str>) -> Schema {
    let values: Vec<&str> = values.into_iter().collect();
    json_schema!({
        "type": "string",
        "enum": values,
        "nullable": true,
    })
}

/// Schema of `Option<DiskType>`
pub(crate) fn optional_disk_type(_: &mut SchemaGenerator) -> Schema {
    nullable_string_enum(DiskType::ALL.iter().map(|disk| disk.as_str()))
}

/// Schema of `Option<ManagedNodePoolLocationPolicy>`
pub(crate) fn optional_location_policy(_: &mut SchemaGenerator) -> Schema {
    nullable_string_enum(LOCATION_POLICIES)
}

/// Schema of `Option<ConditionSeverity>`
pub(crate) fn optional_condition_severity(_: &mut SchemaGenerator) -> Schema {
    nullable_string_enum(CONDITION_SEVERITIES)
}
