use super::{SourceField, SourceForm};

/// Process-wide global property groups, offered regardless of graph position.
const GLOBAL_CATALOG: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "global_action_properties",
        "Action Properties",
        &[
            ("action_type", "Action Type"),
            ("priority", "Priority"),
            ("due_date", "Due Date"),
        ],
    ),
    (
        "global_client_org",
        "Client Organization Properties",
        &[("org_name", "Org Name"), ("account_tier", "Account Tier")],
    ),
];

/// The global catalog as source forms, in catalog order.
pub fn global_sources() -> Vec<SourceForm> {
    GLOBAL_CATALOG
        .iter()
        .map(|(id, name, fields)| SourceForm {
            id: id.to_string(),
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(field_id, label)| SourceField {
                    id: field_id.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        })
        .collect()
}
