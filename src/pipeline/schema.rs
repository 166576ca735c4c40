use serde_json::{json, Map, Value};

/// Declarative description of the shape a structured answer must take.
///
/// Built fresh for every call and never mutated afterwards. The same value
/// renders to the service's `responseSchema` and checks decoded answers for
/// missing required properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object {
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
    },
    Array(Box<Schema>),
    String,
    Number,
    Boolean,
    Enum(Vec<String>),
}

impl Schema {
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Object {
            properties: properties.into_iter().map(|(k, s)| (k.into(), s)).collect(),
            required: Vec::new(),
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    pub fn string() -> Self {
        Schema::String
    }

    pub fn number() -> Self {
        Schema::Number
    }

    pub fn boolean() -> Self {
        Schema::Boolean
    }

    pub fn string_list() -> Self {
        Schema::array(Schema::String)
    }

    pub fn enumeration<S: AsRef<str>>(values: &[S]) -> Self {
        Schema::Enum(values.iter().map(|v| v.as_ref().to_string()).collect())
    }

    /// Mark properties as required. No-op on non-object schemas.
    pub fn with_required(mut self, fields: &[&str]) -> Self {
        if let Schema::Object { required, .. } = &mut self {
            required.extend(fields.iter().map(|f| f.to_string()));
        }
        self
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        match self {
            Schema::Object { properties, .. } => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, schema)| schema),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Object { .. } => "OBJECT",
            Schema::Array(_) => "ARRAY",
            Schema::String | Schema::Enum(_) => "STRING",
            Schema::Number => "NUMBER",
            Schema::Boolean => "BOOLEAN",
        }
    }

    /// Render to the `responseSchema` dialect of the generateContent API.
    pub fn to_wire(&self) -> Value {
        match self {
            Schema::Object {
                properties,
                required,
            } => {
                let mut props = Map::new();
                for (key, schema) in properties {
                    props.insert(key.clone(), schema.to_wire());
                }
                let mut wire = json!({ "type": self.type_name(), "properties": props });
                if !required.is_empty() {
                    wire["required"] = json!(required);
                }
                wire
            }
            Schema::Array(items) => json!({ "type": self.type_name(), "items": items.to_wire() }),
            Schema::Enum(values) => json!({ "type": self.type_name(), "enum": values }),
            Schema::String | Schema::Number | Schema::Boolean => {
                json!({ "type": self.type_name() })
            }
        }
    }

    /// Dotted paths of required properties that are absent or null.
    ///
    /// Descends into nested objects and array items that are present.
    /// Type mismatches are not reported here.
    pub fn missing_required(&self, value: &Value) -> Vec<String> {
        let mut gaps = Vec::new();
        self.collect_gaps(value, "", &mut gaps);
        gaps
    }

    fn collect_gaps(&self, value: &Value, path: &str, gaps: &mut Vec<String>) {
        match (self, value) {
            (
                Schema::Object {
                    properties,
                    required,
                },
                Value::Object(map),
            ) => {
                for name in required {
                    if map.get(name).map_or(true, Value::is_null) {
                        gaps.push(join_path(path, name));
                    }
                }
                for (name, schema) in properties {
                    if let Some(child) = map.get(name) {
                        schema.collect_gaps(child, &join_path(path, name), gaps);
                    }
                }
            }
            (Schema::Array(items), Value::Array(values)) => {
                for (i, child) in values.iter().enumerate() {
                    items.collect_gaps(child, &format!("{path}[{i}]"), gaps);
                }
            }
            _ => {}
        }
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
