//! Schema objects: one table row's worth of typed fields plus CRUD.
//!
//! A [`SchemaObject`] holds two independent field sets. `current` is what
//! setters mutate; `baseline` is the last state known to be persisted and
//! is refreshed after every successful insert or update. Updates address
//! the row through the baseline primary key, so changing the key in memory
//! moves the existing row instead of orphaning it.
//!
//! Validation is the caller's job: call [`SchemaObject::validate_all`] (or
//! [`SchemaObject::ensure_valid`]) before persisting. SQL generation never
//! rejects values on its own.

use crate::connection::{run_statement, Connector, ExecOutcome};
use crate::error::{DatabaseError, DatabaseErrorKind, Error, Result, ValidationError};
use crate::field::TypedField;
use crate::field_set::FieldSet;
use crate::schema::{Reference, SchemaDef};
use crate::sql::{self, Statement};
use crate::value::{Row, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts from [`SchemaObject::update_cascading`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Rows written for the object itself.
    pub affected: u64,
    /// Referencing rows repointed at the new key.
    pub moved: u64,
}

/// In-memory entity bound to one table row's shape.
#[derive(Debug, Clone)]
pub struct SchemaObject {
    schema: Arc<SchemaDef>,
    current: FieldSet,
    baseline: FieldSet,
}

impl SchemaObject {
    /// Empty entity holding the declared default values.
    pub fn new(schema: &Arc<SchemaDef>) -> Self {
        let current = schema.instantiate();
        Self {
            schema: Arc::clone(schema),
            baseline: current.clone(),
            current,
        }
    }

    /// Entity populated from `name -> value` pairs, snapshotted as baseline.
    ///
    /// Fields not mentioned keep their defaults; unknown names fail with
    /// [`crate::SchemaError::FieldNotFound`].
    pub fn with_values<I, K, V>(schema: &Arc<SchemaDef>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut current = schema.instantiate();
        for (name, value) in values {
            let name = name.as_ref();
            current
                .get_mut(name)
                .ok_or_else(|| Error::field_not_found(schema.table(), name))?
                .set_value(value);
        }
        Ok(Self {
            schema: Arc::clone(schema),
            baseline: current.clone(),
            current,
        })
    }

    /// Entity populated from a fetched row.
    pub fn from_row(schema: &Arc<SchemaDef>, row: &Row) -> Result<Self> {
        Self::with_values(schema, row.iter().map(|(c, v)| (c, v.clone())))
    }

    pub fn schema(&self) -> &Arc<SchemaDef> {
        &self.schema
    }

    pub fn table(&self) -> &str {
        self.schema.table()
    }

    /// Current field values.
    pub fn fields(&self) -> &FieldSet {
        &self.current
    }

    /// Last persisted field values.
    pub fn baseline(&self) -> &FieldSet {
        &self.baseline
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let table = self.schema.table();
        self.current
            .get_mut(name)
            .ok_or_else(|| Error::field_not_found(table, name))?
            .set_value(value);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Result<&Value> {
        self.typed_field(name).map(TypedField::value)
    }

    pub fn typed_field(&self, name: &str) -> Result<&TypedField> {
        self.current
            .get(name)
            .ok_or_else(|| Error::field_not_found(self.table(), name))
    }

    /// Primary key name and current field.
    pub fn primary_key(&self) -> Result<(&str, &TypedField)> {
        self.current
            .primary_key()
            .ok_or_else(|| Error::missing_primary_key(self.table()))
    }

    /// Names of fields holding invalid values, in column order. Empty means valid.
    pub fn validate_all(&self) -> Vec<String> {
        self.current.invalid_fields()
    }

    pub fn ensure_valid(&self) -> Result<()> {
        let fields = self.validate_all();
        if fields.is_empty() {
            return Ok(());
        }
        Err(ValidationError {
            table: self.table().to_string(),
            fields,
        }
        .into())
    }

    /// True when current values differ from the baseline.
    pub fn is_modified(&self) -> bool {
        self.current != self.baseline
    }

    /// True when the primary key differs from the persisted one.
    pub fn is_key_changed(&self) -> Result<bool> {
        let (pk, field) = self.primary_key()?;
        Ok(self.persisted_key(pk)? != field.storage_value())
    }

    fn persisted_key(&self, pk: &str) -> Result<Value> {
        self.baseline
            .get(pk)
            .map(TypedField::storage_value)
            .ok_or_else(|| Error::missing_primary_key(self.table()))
    }

    /// Rows of `references` that point at this object's persisted key.
    pub fn dependents<C: Connector>(
        &self,
        connector: &C,
        references: &[Reference],
    ) -> Result<Vec<SchemaObject>> {
        let (pk, _) = self.primary_key()?;
        let key = self.persisted_key(pk)?;
        let mut rows = Vec::new();
        for reference in references {
            rows.extend(Self::fetch_where(
                connector,
                &reference.schema,
                &[(reference.column.as_str(), key.clone())],
            )?);
        }
        Ok(rows)
    }

    /// Update, carrying referencing rows along when the primary key changes.
    ///
    /// Refuses a new key that another row already holds. If rows of
    /// `references` point at the old key, the object is inserted under the
    /// new key, each of those rows is repointed, and the old row is deleted;
    /// otherwise this is a plain [`update`](Self::update). Every step is its
    /// own statement, so a failure part way leaves the earlier steps applied.
    pub fn update_cascading<C: Connector>(
        &mut self,
        connector: &C,
        references: &[Reference],
    ) -> Result<CascadeOutcome> {
        let (pk, field) = self.primary_key()?;
        let pk = pk.to_string();
        let new_key = field.storage_value();
        let old_key = self.persisted_key(&pk)?;
        if new_key == old_key {
            let affected = self.update(connector)?;
            return Ok(CascadeOutcome { affected, moved: 0 });
        }

        let schema = Arc::clone(&self.schema);
        let taken = Self::fetch_where(connector, &schema, &[(pk.as_str(), new_key.clone())])?;
        if !taken.is_empty() {
            warn!(table = self.table(), key = %new_key, "Primary key already in use");
            return Err(DatabaseError::new(
                DatabaseErrorKind::DuplicatePrimaryKey,
                format!("{} already has a row with {}={}", self.table(), pk, new_key),
            )
            .into());
        }

        let mut dependents = Vec::new();
        for reference in references {
            for row in Self::fetch_where(
                connector,
                &reference.schema,
                &[(reference.column.as_str(), old_key.clone())],
            )? {
                dependents.push((row, reference.column.as_str()));
            }
        }
        if dependents.is_empty() {
            let affected = self.update(connector)?;
            return Ok(CascadeOutcome { affected, moved: 0 });
        }

        let affected = self.insert(connector)?;
        let mut moved = 0;
        for (mut row, column) in dependents {
            row.set_field(column, new_key.clone())?;
            moved += row.update(connector)?;
        }
        let stmt = sql::delete(self.table(), &pk, old_key.clone(), connector.placeholder());
        self.execute(connector, &stmt)?;

        info!(
            table = self.table(),
            from = %old_key,
            to = %new_key,
            moved,
            "Moved row to new key"
        );
        Ok(CascadeOutcome { affected, moved })
    }

    /// Insert the current values as a new row. Returns the affected-row count.
    pub fn insert<C: Connector>(&mut self, connector: &C) -> Result<u64> {
        self.primary_key()?;
        let stmt = sql::insert(
            self.table(),
            &self.current.names(),
            self.current.storage_values(),
            connector.placeholder(),
        );
        let affected = self.execute(connector, &stmt)?.rows_affected;
        self.baseline = self.current.clone();
        debug!(table = self.table(), affected, "Inserted object");
        Ok(affected)
    }

    /// Write every field to the row addressed by the baseline primary key.
    pub fn update<C: Connector>(&mut self, connector: &C) -> Result<u64> {
        let (pk, _) = self.primary_key()?;
        let key = self.persisted_key(pk)?;
        let stmt = sql::update(
            self.table(),
            &self.current.names(),
            self.current.storage_values(),
            pk,
            key,
            connector.placeholder(),
        );
        let affected = self.execute(connector, &stmt)?.rows_affected;
        self.baseline = self.current.clone();
        debug!(table = self.table(), affected, "Updated object");
        Ok(affected)
    }

    /// Delete the row addressed by the current primary key.
    ///
    /// Consumes the object; it has no meaning once its row is gone.
    pub fn delete<C: Connector>(self, connector: &C) -> Result<u64> {
        let (pk, field) = self.primary_key()?;
        let stmt = sql::delete(
            self.table(),
            pk,
            field.storage_value(),
            connector.placeholder(),
        );
        let affected = self.execute(connector, &stmt)?.rows_affected;
        debug!(table = self.table(), affected, "Deleted object");
        Ok(affected)
    }

    /// Every row of the schema's table, in result-set order.
    pub fn fetch_all<C: Connector>(connector: &C, schema: &Arc<SchemaDef>) -> Result<Vec<Self>> {
        let stmt = sql::select_all(schema.table());
        Self::fetch(connector, schema, &stmt)
    }

    /// Rows matching every `field = value` filter. No filters fetches all rows.
    pub fn fetch_where<C: Connector>(
        connector: &C,
        schema: &Arc<SchemaDef>,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Self>> {
        if let Some((name, _)) = filters.iter().find(|(n, _)| !schema.fields().contains(n)) {
            return Err(Error::field_not_found(schema.table(), *name));
        }
        let stmt = sql::select_where(schema.table(), filters, connector.placeholder());
        Self::fetch(connector, schema, &stmt)
    }

    fn fetch<C: Connector>(
        connector: &C,
        schema: &Arc<SchemaDef>,
        stmt: &Statement,
    ) -> Result<Vec<Self>> {
        let outcome = run_statement(connector, stmt)?;
        let objects = outcome
            .rows
            .iter()
            .map(|row| Self::from_row(schema, row))
            .collect::<Result<Vec<_>>>()?;
        debug!(table = schema.table(), count = objects.len(), "Fetched objects");
        Ok(objects)
    }

    fn execute<C: Connector>(&self, connector: &C, stmt: &Statement) -> Result<ExecOutcome> {
        run_statement(connector, stmt).map_err(|err| {
            if let Some(kind) = err.database_kind().filter(|k| k.is_constraint()) {
                warn!(table = self.table(), %kind, "Constraint violation");
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DatabaseError, DatabaseErrorKind, SchemaError};
    use crate::tables;
    use crate::testing::RecordingConnector;
    use chrono::NaiveDate;

    fn classification(id: i64, firm: i64, guid: &str) -> SchemaObject {
        SchemaObject::with_values(
            &tables::tron_pos_web_classifications(),
            [
                ("id", Value::from(id)),
                ("tpfirm_id", Value::from(firm)),
                ("TopWebClassificationGUID", Value::from(guid)),
            ],
        )
        .unwrap()
    }

    fn no_pk_schema() -> Arc<SchemaDef> {
        SchemaDef::builder("Loose")
            .field("name", TypedField::varchar(20))
            .build()
            .unwrap()
    }

    #[test]
    fn test_construct_from_values_sets_baseline() {
        let obj = classification(4, 1, "g-4");
        assert_eq!(obj.field("id").unwrap(), &Value::from(4));
        assert_eq!(obj.field("Name").unwrap(), &Value::Null);
        assert_eq!(obj.baseline(), obj.fields());
        assert!(!obj.is_modified());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = tables::tron_pos_web_classifications();
        let err = SchemaObject::with_values(&schema, [("bogus", 1)]).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::FieldNotFound { ref field, .. }) if field == "bogus"
        ));

        let mut obj = SchemaObject::new(&schema);
        assert!(obj.set_field("bogus", 1).is_err());
        assert!(obj.field("bogus").is_err());
    }

    #[test]
    fn test_setters_do_not_touch_baseline() {
        let mut obj = classification(4, 1, "g-4");
        obj.set_field("Name", "web").unwrap();

        assert!(obj.is_modified());
        assert_eq!(obj.baseline().get("Name").unwrap().value(), &Value::Null);
    }

    #[test]
    fn test_validate_all_reports_invalid_fields() {
        let schema = tables::tron_pos_web_classifications();
        let mut obj = SchemaObject::new(&schema);
        assert_eq!(
            obj.validate_all(),
            vec!["id", "tpfirm_id", "TopWebClassificationGUID"]
        );

        obj.set_field("id", 1).unwrap();
        obj.set_field("tpfirm_id", 2).unwrap();
        obj.set_field("TopWebClassificationGUID", "abc").unwrap();
        obj.set_field("Name", "x".repeat(50)).unwrap();
        assert_eq!(obj.validate_all(), vec!["Name"]);
        assert!(matches!(obj.ensure_valid(), Err(Error::Validation(_))));

        obj.set_field("Name", Value::Null).unwrap();
        assert!(obj.validate_all().is_empty());
        assert!(obj.ensure_valid().is_ok());
    }

    #[test]
    fn test_insert_sql_and_baseline_refresh() {
        let connector = RecordingConnector::new();
        let mut obj = classification(4, 1, "g-4");
        obj.set_field("Name", "web").unwrap();

        assert_eq!(obj.insert(&connector).unwrap(), 1);

        let statements = connector.statements();
        assert_eq!(
            statements[0].0,
            "INSERT INTO TronPosWebClassifications (id,tpfirm_id,TopWebClassificationGUID,Name) VALUES (%s,%s,%s,%s)"
        );
        assert_eq!(
            statements[0].1,
            vec![
                Value::from(4),
                Value::from(1),
                Value::from("g-4"),
                Value::from("web")
            ]
        );
        assert!(!obj.is_modified());
    }

    #[test]
    fn test_update_addresses_baseline_key() {
        let connector = RecordingConnector::new();
        let mut obj = classification(5, 1, "g-5");
        obj.set_field("id", 7).unwrap();

        obj.update(&connector).unwrap();

        let (sql, params) = &connector.statements()[0];
        assert_eq!(
            sql,
            "UPDATE TronPosWebClassifications SET id=%s,tpfirm_id=%s,TopWebClassificationGUID=%s,Name=%s WHERE id=%s"
        );
        assert_eq!(params.first(), Some(&Value::from(7)));
        assert_eq!(params.last(), Some(&Value::from(5)));

        // baseline now carries the new key
        obj.set_field("Name", "again").unwrap();
        obj.update(&connector).unwrap();
        assert_eq!(connector.statements()[1].1.last(), Some(&Value::from(7)));
    }

    #[test]
    fn test_failed_update_keeps_baseline() {
        let connector = RecordingConnector::new();
        connector.fail_next(DatabaseError::new(
            DatabaseErrorKind::DuplicatePrimaryKey,
            "duplicate",
        ));
        let mut obj = classification(5, 1, "g-5");
        obj.set_field("id", 6).unwrap();

        assert!(obj.update(&connector).is_err());
        assert_eq!(obj.baseline().get("id").unwrap().value(), &Value::from(5));
        assert!(obj.is_modified());
    }

    #[test]
    fn test_committed_update_refreshes_baseline_despite_close_error() {
        let connector = RecordingConnector::new();
        connector.fail_close();
        let mut obj = classification(5, 1, "g-5");
        obj.set_field("id", 6).unwrap();

        assert_eq!(obj.update(&connector).unwrap(), 1);
        assert!(!obj.is_modified());

        obj.set_field("Name", "next").unwrap();
        obj.update(&connector).unwrap();
        assert_eq!(connector.statements()[1].1.last(), Some(&Value::from(6)));
    }

    fn classification_row(id: i64, firm: i64) -> Row {
        Row::new(
            vec!["id".into(), "tpfirm_id".into(), "TopWebClassificationGUID".into(), "Name".into()],
            vec![Value::from(id), Value::from(firm), Value::from(format!("g-{}", id)), Value::Null],
        )
    }

    fn rows(rows: Vec<Row>) -> ExecOutcome {
        ExecOutcome {
            rows_affected: 0,
            rows,
        }
    }

    fn firm(id: i64) -> SchemaObject {
        SchemaObject::with_values(
            &tables::tron_pos_odoo_exchange_up(),
            [("tpfirm_id", Value::from(id)), ("tpfirmName", Value::from("Firm"))],
        )
        .unwrap()
    }

    #[test]
    fn test_cascading_key_change_moves_children() {
        let connector = RecordingConnector::new();
        connector.respond(rows(Vec::new()));
        connector.respond(rows(vec![classification_row(10, 1), classification_row(11, 1)]));
        let refs = tables::references_to(tables::TRON_POS_ODOO_EXCHANGE_UP);

        let mut obj = firm(1);
        obj.set_field("tpfirm_id", 2).unwrap();
        assert!(obj.is_key_changed().unwrap());

        let outcome = obj.update_cascading(&connector, &refs).unwrap();
        assert_eq!(outcome, CascadeOutcome { affected: 1, moved: 2 });
        assert!(!obj.is_key_changed().unwrap());

        let ops: Vec<(String, Value)> = connector
            .statements()
            .into_iter()
            .map(|(sql, params)| {
                let verb = sql.split_whitespace().next().unwrap_or_default().to_string();
                (verb, params.first().cloned().unwrap_or_default())
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                ("SELECT".to_string(), Value::from(2)),
                ("SELECT".to_string(), Value::from(1)),
                ("INSERT".to_string(), Value::from(2)),
                ("UPDATE".to_string(), Value::from(10)),
                ("UPDATE".to_string(), Value::from(11)),
                ("DELETE".to_string(), Value::from(1)),
            ]
        );
        // children carry the new firm key
        assert_eq!(connector.statements()[3].1[1], Value::from(2));
        assert_eq!(
            connector.statements()[0].0,
            "SELECT * FROM TronPosOdooExchangeUp WHERE tpfirm_id=%s"
        );
    }

    #[test]
    fn test_cascading_refuses_taken_key() {
        let connector = RecordingConnector::new();
        let taken = firm(2);
        connector.respond(rows(vec![Row::new(
            taken.fields().names().iter().map(|n| n.to_string()).collect(),
            taken.fields().storage_values(),
        )]));

        let mut obj = firm(1);
        obj.set_field("tpfirm_id", 2).unwrap();
        let err = obj.update_cascading(&connector, &[]).unwrap_err();

        assert_eq!(err.database_kind(), Some(DatabaseErrorKind::DuplicatePrimaryKey));
        assert_eq!(connector.statements().len(), 1);
        assert!(obj.is_key_changed().unwrap());
    }

    #[test]
    fn test_cascading_without_children_is_plain_update() {
        let connector = RecordingConnector::new();
        connector.respond(rows(Vec::new()));
        connector.respond(rows(Vec::new()));
        let refs = tables::references_to(tables::TRON_POS_ODOO_EXCHANGE_UP);

        let mut obj = firm(1);
        obj.set_field("tpfirm_id", 3).unwrap();
        let outcome = obj.update_cascading(&connector, &refs).unwrap();

        assert_eq!(outcome, CascadeOutcome { affected: 1, moved: 0 });
        let statements = connector.statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[2].0.starts_with("UPDATE TronPosOdooExchangeUp SET"));
        assert_eq!(statements[2].1.last(), Some(&Value::from(1)));
    }

    #[test]
    fn test_dependents_use_persisted_key() {
        let connector = RecordingConnector::new();
        connector.respond(rows(vec![classification_row(10, 4)]));
        let refs = tables::references_to(tables::TRON_POS_ODOO_EXCHANGE_UP);

        let mut obj = firm(4);
        obj.set_field("tpfirm_id", 9).unwrap();
        let found = obj.dependents(&connector, &refs).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].table(), tables::TRON_POS_WEB_CLASSIFICATIONS);
        assert_eq!(
            connector.statements()[0],
            (
                "SELECT * FROM TronPosWebClassifications WHERE tpfirm_id=%s".to_string(),
                vec![Value::from(4)]
            )
        );
    }

    #[test]
    fn test_delete_uses_literal_for_zero_key() {
        let connector = RecordingConnector::new();
        classification(0, 1, "zero").delete(&connector).unwrap();
        classification(3, 1, "three").delete(&connector).unwrap();

        let statements = connector.statements();
        assert_eq!(
            statements[0],
            ("DELETE FROM TronPosWebClassifications WHERE id=0".to_string(), vec![])
        );
        assert_eq!(
            statements[1],
            (
                "DELETE FROM TronPosWebClassifications WHERE id=%s".to_string(),
                vec![Value::from(3)]
            )
        );
    }

    #[test]
    fn test_delete_uses_current_key() {
        let connector = RecordingConnector::new();
        let mut obj = classification(3, 1, "three");
        obj.set_field("id", 8).unwrap();
        obj.delete(&connector).unwrap();
        assert_eq!(connector.statements()[0].1, vec![Value::from(8)]);
    }

    #[test]
    fn test_missing_primary_key_fails_every_mutation() {
        let schema = no_pk_schema();
        let connector = RecordingConnector::new();

        let mut obj = SchemaObject::with_values(&schema, [("name", "x")]).unwrap();
        for err in [
            obj.primary_key().map(|_| ()).unwrap_err(),
            obj.insert(&connector).map(|_| ()).unwrap_err(),
            obj.update(&connector).map(|_| ()).unwrap_err(),
            obj.clone().delete(&connector).map(|_| ()).unwrap_err(),
        ] {
            assert!(matches!(
                err,
                Error::Schema(SchemaError::MissingPrimaryKey { .. })
            ));
        }
        assert!(connector.events().is_empty());
    }

    #[test]
    fn test_fetch_maps_rows_in_order() {
        let connector = RecordingConnector::new();
        let rows = vec![
            Row::new(
                vec!["id".into(), "tpfirm_id".into(), "TopWebClassificationGUID".into(), "Name".into()],
                vec![Value::from(2), Value::from(1), Value::from("b"), Value::Null],
            ),
            Row::new(
                vec!["id".into(), "tpfirm_id".into(), "TopWebClassificationGUID".into(), "Name".into()],
                vec![Value::from(1), Value::from(1), Value::from("a"), Value::from("web")],
            ),
        ];
        connector.respond(ExecOutcome {
            rows_affected: 2,
            rows,
        });

        let schema = tables::tron_pos_web_classifications();
        let objects = SchemaObject::fetch_all(&connector, &schema).unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].field("id").unwrap(), &Value::from(2));
        assert_eq!(objects[1].field("Name").unwrap(), &Value::from("web"));
        assert!(objects.iter().all(|o| !o.is_modified()));
        assert_eq!(
            connector.statements()[0].0,
            "SELECT * FROM TronPosWebClassifications"
        );
    }

    #[test]
    fn test_fetch_where_builds_conjunction() {
        let connector = RecordingConnector::new();
        let schema = tables::tron_pos_web_classifications();

        SchemaObject::fetch_where(
            &connector,
            &schema,
            &[("tpfirm_id", Value::from(1)), ("Name", Value::from("web"))],
        )
        .unwrap();
        SchemaObject::fetch_where(&connector, &schema, &[]).unwrap();

        let statements = connector.statements();
        assert_eq!(
            statements[0],
            (
                "SELECT * FROM TronPosWebClassifications WHERE tpfirm_id=%s AND Name=%s"
                    .to_string(),
                vec![Value::from(1), Value::from("web")]
            )
        );
        assert_eq!(
            statements[1],
            ("SELECT * FROM TronPosWebClassifications".to_string(), vec![])
        );
    }

    #[test]
    fn test_fetch_where_rejects_unknown_filter() {
        let connector = RecordingConnector::new();
        let schema = tables::tron_pos_web_classifications();
        let err =
            SchemaObject::fetch_where(&connector, &schema, &[("nope", Value::from(1))]).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::FieldNotFound { .. })));
        assert!(connector.events().is_empty());
    }

    #[test]
    fn test_storage_round_trip_from_row() {
        let schema = tables::tron_pos_odoo_exchange_up();
        let day = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let obj = SchemaObject::with_values(
            &schema,
            [
                ("tpfirm_id", Value::from(1)),
                ("tpfirmActive", Value::from("True")),
                ("recDate", Value::from(day)),
                ("OdooECommerce", Value::Bool(false)),
                ("RowChID", Value::from(99_i64)),
            ],
        )
        .unwrap();

        let stored = obj.fields();
        assert_eq!(stored.get("tpfirm_id").unwrap().storage_value(), Value::from(1));
        assert_eq!(stored.get("tpfirmActive").unwrap().storage_value(), Value::from(1));
        assert_eq!(stored.get("OdooECommerce").unwrap().storage_value(), Value::from(0));
        assert_eq!(
            stored.get("recDate").unwrap().storage_value(),
            Value::DateTime(day.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(stored.get("RowChID").unwrap().storage_value(), Value::from(99_i64));
    }
}
