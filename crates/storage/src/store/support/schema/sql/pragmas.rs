#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"
        PRAGMA synchronous=NORMAL;
"#;
