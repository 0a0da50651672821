//! Resources bundled into the binary, grouped by language.

#[allow(unused)]
macro_rules! resource {
    ($lang_code:literal, $file_name:literal) => {{
        let text: &'static str = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/",
            $lang_code,
            "/",
            $file_name
        ));

        (concat!($lang_code, "/", $file_name), text.as_bytes())
    }};
}

#[allow(unused)]
const ERROR_MSG: &str = "bundled resources are tested.";

pub mod en;
