use crate::{
    entity::EntityKind,
    reference,
    value::{Columns, Value},
    Error,
};

fn invalid(entity: &'static str, message: impl Into<String>) -> Error {
    Error::Validation {
        entity,
        message: message.into(),
    }
}

fn text(row: &dyn Columns, column: &str) -> Option<String> {
    match row.column(column) {
        Some(Value::Text(value)) => Some(value),
        _ => None,
    }
}

fn json(row: &dyn Columns, column: &str) -> Option<serde_json::Value> {
    match row.column(column) {
        Some(Value::Json(value)) => Some(value),
        _ => None,
    }
}

fn email_address(entity: &'static str, row: &dyn Columns, column: &str) -> Result<(), Error> {
    match text(row, column) {
        Some(address) if looks_like_email(&address) => Ok(()),
        Some(address) => Err(invalid(entity, format!("{address:?} is not an email address"))),
        None => Ok(()),
    }
}

fn looks_like_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn currency(
    entity: &'static str,
    row: &dyn Columns,
    reference: &reference::Cache,
) -> Result<(), Error> {
    match text(row, "currency") {
        Some(code) if reference.currencies.contains(&code) => Ok(()),
        Some(code) => Err(invalid(entity, format!("unknown currency {code:?}"))),
        None => Ok(()),
    }
}

fn known_entity_type(entity: &'static str, row: &dyn Columns) -> Result<(), Error> {
    match text(row, "entity_type") {
        Some(name) => EntityKind::from_discriminator(&name)
            .map(|_| ())
            .map_err(|_| invalid(entity, format!("unknown entity type {name:?}"))),
        None => Ok(()),
    }
}

fn object_or_null(entity: &'static str, row: &dyn Columns, column: &str) -> Result<(), Error> {
    match json(row, column) {
        Some(serde_json::Value::Object(_)) | None => Ok(()),
        Some(_) => Err(invalid(entity, format!("{column} must be a JSON object"))),
    }
}

pub(crate) fn user(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    email_address("users", row, "email")
}

pub(crate) fn portal_user(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    email_address("portal_users", row, "email")
}

pub(crate) fn email(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    email_address("emails", row, "address")
}

pub(crate) fn recipient(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    email_address("email_program_recipients", row, "email")
}

pub(crate) fn opportunity(row: &dyn Columns, reference: &reference::Cache) -> Result<(), Error> {
    currency("opportunities", row, reference)?;
    match row.column("probability") {
        Some(Value::Int(probability)) if !(0..=100).contains(&probability) => Err(invalid(
            "opportunities",
            format!("probability {probability} is outside 0..=100"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn currency_only(row: &dyn Columns, reference: &reference::Cache) -> Result<(), Error> {
    // Shared by several tables; name the column rather than the table.
    currency("currency", row, reference)
}

pub(crate) fn invoice(row: &dyn Columns, reference: &reference::Cache) -> Result<(), Error> {
    currency("invoices", row, reference)?;
    match (row.column("issued_on"), row.column("due_on")) {
        (Some(Value::Date(issued)), Some(Value::Date(due))) if due < issued => {
            Err(invalid("invoices", "due_on precedes issued_on"))
        }
        _ => Ok(()),
    }
}

pub(crate) fn line_item(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    match row.column("quantity") {
        Some(Value::Int(quantity)) if quantity <= 0 => {
            Err(invalid("line item", format!("quantity {quantity} must be positive")))
        }
        _ => Ok(()),
    }
}

pub(crate) fn address(row: &dyn Columns, reference: &reference::Cache) -> Result<(), Error> {
    match text(row, "country_code") {
        Some(code) if reference.countries.contains(&code) => Ok(()),
        Some(code) => Err(invalid("addresses", format!("unknown country {code:?}"))),
        None => Ok(()),
    }
}

pub(crate) fn saved_search(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    match json(row, "filters") {
        Some(serde_json::Value::Object(_)) => Ok(()),
        _ => Err(invalid("saved_searches", "filters must be a JSON object")),
    }
}

pub(crate) fn knowledge_article_relation(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    if row.column("article_id") == row.column("related_article_id") {
        return Err(invalid(
            "knowledge_article_relations",
            "an article cannot be related to itself",
        ));
    }
    Ok(())
}

pub(crate) fn custom_field_group(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    known_entity_type("custom_field_sections", row)
}

pub(crate) fn custom_field(row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
    known_entity_type("custom_fields", row)?;
    object_or_null("custom_fields", row, "validation_rules")
}

pub(crate) fn ocr_template_field(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    object_or_null("ocr_template_fields", row, "region")?;
    object_or_null("ocr_template_fields", row, "validation_rules")
}

pub(crate) fn contact_merge_log(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    if row.column("primary_contact_id") == row.column("duplicate_contact_id") {
        return Err(invalid(
            "contact_merge_logs",
            "a contact cannot be merged into itself",
        ));
    }
    match json(row, "merge_data") {
        Some(serde_json::Value::Null) | None => {
            Err(invalid("contact_merge_logs", "merge_data is required"))
        }
        Some(_) => Ok(()),
    }
}

/// `values` must be an array of team ids.
pub(crate) fn feature_segment(
    row: &dyn Columns,
    _reference: &reference::Cache,
) -> Result<(), Error> {
    match json(row, "values") {
        Some(serde_json::Value::Array(values)) if values.iter().all(serde_json::Value::is_i64) => {
            Ok(())
        }
        _ => Err(invalid(
            "feature_segments",
            "values must be an array of team ids",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAddress, NewFeatureFlagSegment};
    use serde_json::json;

    fn reference() -> reference::Cache {
        reference::Cache::builtin().unwrap()
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("jane@acme.test"));
        assert!(!looks_like_email("jane.acme.test"));
        assert!(!looks_like_email("@acme.test"));
        assert!(!looks_like_email("jane doe@acme.test"));
    }

    #[test]
    fn addresses_need_a_known_country() {
        let mut address = NewAddress {
            team_id: 1,
            addressable_type: "people".into(),
            addressable_id: 1,
            kind: "billing".into(),
            line1: "1 Main St".into(),
            line2: None,
            city: "Springfield".into(),
            region: None,
            postal_code: None,
            country_code: "US".into(),
        };
        assert!(address_ok(&address));
        address.country_code = "ZZ".into();
        assert!(!address_ok(&address));
    }

    fn address_ok(draft: &NewAddress) -> bool {
        address(draft, &reference()).is_ok()
    }

    #[test]
    fn feature_segment_values_are_team_ids() {
        let mut segment = NewFeatureFlagSegment {
            feature: "pipeline-v2".into(),
            scope: "team".into(),
            values: json!([1, 2]),
            active: true,
        };
        assert!(feature_segment(&segment, &reference()).is_ok());
        segment.values = json!(["1"]);
        assert!(matches!(
            feature_segment(&segment, &reference()),
            Err(Error::Validation { entity: "feature_segments", .. })
        ));
    }
}
