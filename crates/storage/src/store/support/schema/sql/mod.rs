#![forbid(unsafe_code)]

mod core;
mod history;
mod indexes;
mod nodes;
mod pragmas;
mod view_states;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(pragmas::SQL);
    sql.push_str(core::SQL);
    sql.push_str(nodes::SQL);
    sql.push_str(history::SQL);
    sql.push_str(view_states::SQL);
    sql.push_str(indexes::SQL);
    sql
}
