//! The four entity families of the registry.
//!
//! Filterable attributes mirror the search forms of the admin frontend; the
//! natural keys are the reference numbers printed on the paper records. Note
//! the `governorate` / `headquarters` split on lands: the wire kept the old
//! form-field name when the column was renamed.

use super::{
    AttributeDef, AttributeType, CREATED_DESC, ChildCollectionDef, EntityConfig, NaturalKeyDef,
    OrderingKey, SortOrder,
};

const LAND_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new("referenceNumber", "reference_number", AttributeType::Text).required(),
    AttributeDef::new("governorate", "headquarters", AttributeType::Text).filterable(),
    AttributeDef::new("district", "district", AttributeType::Text),
    AttributeDef::new("areaSize", "area_size", AttributeType::Float),
    AttributeDef::new("usageStatus", "usage_status", AttributeType::Text).filterable(),
    AttributeDef::new("approvalStatus", "approval_status", AttributeType::Text).filterable(),
    AttributeDef::new("phase", "phase", AttributeType::Text).filterable(),
    AttributeDef::new("notes", "notes", AttributeType::Text),
];

const LAND_COORDINATE_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new("pointNumber", "point_number", AttributeType::Integer).required(),
    AttributeDef::new("latitude", "latitude", AttributeType::Float).required(),
    AttributeDef::new("longitude", "longitude", AttributeType::Float).required(),
];

const LAND_COORDINATES: ChildCollectionDef = ChildCollectionDef {
    segment: "coordinates",
    table: "land_coordinates",
    parent_column: "land_id",
    parent_attribute: "landId",
    attributes: LAND_COORDINATE_ATTRIBUTES,
    ordering: OrderingKey {
        column: "point_number",
        order: SortOrder::Ascending,
    },
};

/// Land parcels owned or claimed by the authority.
pub static LANDS: EntityConfig = EntityConfig {
    path: "lands",
    display_name: "Land",
    table: "lands",
    attributes: LAND_ATTRIBUTES,
    natural_key: Some(NaturalKeyDef {
        segment: "by-reference",
        attribute: "referenceNumber",
        column: "reference_number",
    }),
    ordering: CREATED_DESC,
    children: &[LAND_COORDINATES],
};

const BUILDING_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new("buildingNumber", "building_number", AttributeType::Text).required(),
    AttributeDef::new("name", "name", AttributeType::Text),
    AttributeDef::new("governorate", "governorate", AttributeType::Text).filterable(),
    AttributeDef::new("district", "district", AttributeType::Text),
    AttributeDef::new("stage", "stage", AttributeType::Text).filterable(),
    AttributeDef::new("affiliation", "affiliation", AttributeType::Text).filterable(),
    AttributeDef::new("usageStatus", "usage_status", AttributeType::Text).filterable(),
    AttributeDef::new("educationType", "education_type", AttributeType::Text).filterable(),
    AttributeDef::new("classroomCount", "classroom_count", AttributeType::Integer),
    AttributeDef::new("notes", "notes", AttributeType::Text),
];

/// School buildings operated by the authority.
pub static BUILDINGS: EntityConfig = EntityConfig {
    path: "buildings",
    display_name: "Building",
    table: "buildings",
    attributes: BUILDING_ATTRIBUTES,
    natural_key: Some(NaturalKeyDef {
        segment: "by-number",
        attribute: "buildingNumber",
        column: "building_number",
    }),
    ordering: CREATED_DESC,
    children: &[],
};

const RENTAL_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new(
        "identificationNumber",
        "identification_number",
        AttributeType::Text,
    )
    .required(),
    AttributeDef::new("buildingName", "building_name", AttributeType::Text),
    AttributeDef::new("governorate", "governorate", AttributeType::Text),
    AttributeDef::new("status", "status", AttributeType::Text).filterable(),
    AttributeDef::new("substatus", "substatus", AttributeType::Text).filterable(),
    AttributeDef::new("buildingType", "building_type", AttributeType::Text).filterable(),
    AttributeDef::new("monthlyRent", "monthly_rent", AttributeType::Float),
    AttributeDef::new("maintenanceRequired", "maintenance_required", AttributeType::Boolean),
    AttributeDef::new("notes", "notes", AttributeType::Text),
];

const RENTAL_DECISION_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new("decisionNumber", "decision_number", AttributeType::Text).required(),
    AttributeDef::new("decisionDate", "decision_date", AttributeType::Date).required(),
    AttributeDef::new("decisionType", "decision_type", AttributeType::Text),
    AttributeDef::new("notes", "notes", AttributeType::Text),
];

const RENTAL_DECISIONS: ChildCollectionDef = ChildCollectionDef {
    segment: "decisions",
    table: "rental_decisions",
    parent_column: "rental_id",
    parent_attribute: "rentalId",
    attributes: RENTAL_DECISION_ATTRIBUTES,
    ordering: OrderingKey {
        column: "decision_date",
        order: SortOrder::Descending,
    },
};

/// Buildings rented from private owners.
pub static RENTALS: EntityConfig = EntityConfig {
    path: "rentals",
    display_name: "Rental building",
    table: "rentals",
    attributes: RENTAL_ATTRIBUTES,
    natural_key: Some(NaturalKeyDef {
        segment: "by-id-number",
        attribute: "identificationNumber",
        column: "identification_number",
    }),
    ordering: CREATED_DESC,
    children: &[RENTAL_DECISIONS],
};

const DISPLACEMENT_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::new("referenceNumber", "reference_number", AttributeType::Text).required(),
    AttributeDef::new("buildingCode", "building_code", AttributeType::Text).filterable(),
    AttributeDef::new("buildingName", "building_name", AttributeType::Text),
    AttributeDef::new("displacementType", "displacement_type", AttributeType::Text).filterable(),
    AttributeDef::new("status", "status", AttributeType::Text).filterable(),
    AttributeDef::new("compensationAmount", "compensation_amount", AttributeType::Float),
    AttributeDef::new("notes", "notes", AttributeType::Text),
];

/// Expropriation and displacement case records.
pub static DISPLACEMENTS: EntityConfig = EntityConfig {
    path: "displacements",
    display_name: "Displacement record",
    table: "displacements",
    attributes: DISPLACEMENT_ATTRIBUTES,
    natural_key: Some(NaturalKeyDef {
        segment: "by-reference",
        attribute: "referenceNumber",
        column: "reference_number",
    }),
    ordering: CREATED_DESC,
    children: &[],
};

/// All entity families, in route-registration order.
pub static ENTITIES: [&EntityConfig; 4] = [&LANDS, &BUILDINGS, &RENTALS, &DISPLACEMENTS];

/// Resolves a URL collection segment to its catalog entry.
pub fn entity_by_path(path: &str) -> Option<&'static EntityConfig> {
    ENTITIES.iter().copied().find(|e| e.path == path)
}
