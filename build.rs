// build.rs

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

const VOCABULARY_PATH: &str = "options/sbatch.toml";

#[derive(Deserialize)]
struct VocabularyFile {
    options: BTreeMap<String, OptionDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionDef {
    short: Option<String>,
    #[serde(default = "default_arity")]
    arity: String,
}

fn default_arity() -> String {
    "value".to_string()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", VOCABULARY_PATH);

    // --- 1. Load the option vocabulary ---
    let content = fs::read_to_string(VOCABULARY_PATH)
        .unwrap_or_else(|_| panic!("Failed to read option vocabulary: {}", VOCABULARY_PATH));
    let vocabulary: VocabularyFile = toml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", VOCABULARY_PATH, e));

    // --- 2. Generate the static option table ---
    let mut table_code = String::from("pub static OPTIONS: &[OptionSpec] = &[\n");
    for (name, def) in &vocabulary.options {
        assert!(
            name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "Option names must be lowercase snake_case: '{}'",
            name
        );

        let short = match &def.short {
            Some(s) => {
                let mut chars = s.chars();
                let c = chars.next().expect("Empty short alias");
                assert!(chars.next().is_none(), "Short alias of '{}' must be one character", name);
                format!("Some('{}')", c)
            }
            None => "None".to_string(),
        };

        let arity = match def.arity.as_str() {
            "value" => "Arity::Value",
            "flag" => "Arity::Flag",
            "optional" => "Arity::Optional",
            other => panic!("Unknown arity '{}' for option '{}'", other, name),
        };

        table_code.push_str(&format!(
            "    OptionSpec {{ name: \"{}\", short: {}, arity: {} }},\n",
            name, short, arity
        ));
    }
    table_code.push_str("];\n");

    // --- 3. Generate one setter per option for the `Slurm` session ---
    let mut setters_code = String::from("impl Slurm {\n");
    for name in vocabulary.options.keys() {
        setters_code.push_str(&format!(
            "    #[doc = \"Sets the `--{}` option.\"]\n    pub fn set_{}(&mut self, value: impl Into<OptionValue>) -> &mut Self {{\n        self.set_option(\"{}\", value)\n    }}\n",
            name.replace('_', "-"),
            name,
            name
        ));
    }
    setters_code.push_str("}\n");

    // --- 4. Write the generated code to the `OUT_DIR` directory ---
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    fs::write(Path::new(&out_dir).join("sbatch_options.rs"), table_code)
        .expect("Failed to write sbatch_options.rs");
    fs::write(Path::new(&out_dir).join("sbatch_setters.rs"), setters_code)
        .expect("Failed to write sbatch_setters.rs");
}
