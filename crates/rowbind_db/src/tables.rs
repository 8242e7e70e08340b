//! Table definitions for the POS/Odoo exchange database.

use crate::error::SchemaError;
use crate::field::TypedField;
use crate::schema::{Reference, SchemaDef};
use std::sync::Arc;

pub const TRON_POS_ODOO_EXCHANGE_UP: &str = "TronPosOdooExchangeUp";
pub const TRON_POS_WEB_CLASSIFICATIONS: &str = "TronPosWebClassifications";

/// Per-firm exchange settings between the POS server and Odoo.
pub fn tron_pos_odoo_exchange_up() -> Arc<SchemaDef> {
    SchemaDef::builder(TRON_POS_ODOO_EXCHANGE_UP)
        .field("tpfirm_id", TypedField::int32().primary_key())
        .field("tpfirmName", TypedField::varchar(255))
        .field("tpfirmActive", TypedField::bit())
        .field("TronRetailServerDataBase", TypedField::varchar(255))
        .field("OdooHost", TypedField::varchar(255))
        .field("OdooPort", TypedField::int32())
        .field("OdooDataBase", TypedField::varchar(255))
        .field("OdooUserName", TypedField::varchar(255))
        .field("OdooPassword", TypedField::varchar(255))
        .field("recDate", TypedField::datetime().nullable())
        .field("OdooECommerce", TypedField::bit().nullable())
        .field("RowChID", TypedField::int64())
        .field("SyncClientUser", TypedField::varchar(255).nullable())
        .field("SyncClientPassword", TypedField::varchar(1000).nullable())
        .field("WebClassificationTable", TypedField::varchar(50).nullable())
        .field("TopWebClassifications", TypedField::bit())
        .build()
        .expect("static table definition has unique field names")
}

/// Web shop classifications belonging to a firm.
pub fn tron_pos_web_classifications() -> Arc<SchemaDef> {
    SchemaDef::builder(TRON_POS_WEB_CLASSIFICATIONS)
        .field("id", TypedField::int32().primary_key())
        .field("tpfirm_id", TypedField::int32().foreign_key())
        .field("TopWebClassificationGUID", TypedField::varchar(255))
        .field("Name", TypedField::varchar(50).nullable())
        .build()
        .expect("static table definition has unique field names")
}

/// All known table definitions.
pub fn all() -> Vec<Arc<SchemaDef>> {
    vec![tron_pos_odoo_exchange_up(), tron_pos_web_classifications()]
}

/// Columns in other tables that point at `table`'s primary key.
pub fn references_to(table: &str) -> Vec<Reference> {
    if table.eq_ignore_ascii_case(TRON_POS_ODOO_EXCHANGE_UP) {
        vec![Reference::new(tron_pos_web_classifications(), "tpfirm_id")]
    } else {
        Vec::new()
    }
}

/// Look up a table definition by table name (case-insensitive).
pub fn by_name(name: &str) -> Result<Arc<SchemaDef>, SchemaError> {
    all()
        .into_iter()
        .find(|s| s.table().eq_ignore_ascii_case(name))
        .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
}
