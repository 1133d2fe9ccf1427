//! Rendering contexts and the function environment bound into templates.
//!
//! A [`RenderContext`] is anything that serializes into the template's
//! variables and can produce a [`FunctionTable`]: named functions and
//! filters that templates may call. The table is built fresh for every
//! render from the context itself, so project-level and phase-level
//! templates see different capability sets without the engine knowing
//! about either.
//!
//! | function                   | project context | phase context      |
//! |----------------------------|-----------------|--------------------|
//! | `has_inputs(phase=..)`     | `phase` required | defaults to self  |
//! | `has_outputs(phase=..)`    | `phase` required | defaults to self  |
//! | `worker_package(phase=..)` | `phase` required | defaults to self  |
//! | `worker_import_path(phase=..)` | `phase` required | defaults to self |
//!
//! Filters available everywhere: `lower_camel`, `upper_camel`,
//! `snake_case`, `kebab_case`, `plural`, `package_name`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tera::{Tera, Value};

use pilot_core::{naming, BoundPhase, DerivedModel};

/// A template-callable function.
pub type CapabilityFn = Arc<dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// A template filter.
pub type FilterFn =
    Arc<dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

// ---------------------------------------------------------------------------
// FunctionTable
// ---------------------------------------------------------------------------

/// Name → function/filter table exposed to a single render.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<&'static str, CapabilityFn>,
    filters: BTreeMap<&'static str, FilterFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only the casing/pluralization filters.
    pub fn with_naming_filters() -> Self {
        Self::new()
            .filter("lower_camel", string_filter("lower_camel", naming::lower_camel))
            .filter("upper_camel", string_filter("upper_camel", naming::upper_camel))
            .filter("snake_case", string_filter("snake_case", naming::snake_case))
            .filter("kebab_case", string_filter("kebab_case", naming::kebab_case))
            .filter("plural", string_filter("plural", naming::pluralize))
            .filter("package_name", string_filter("package_name", naming::package_name))
    }

    /// Add or replace a function.
    pub fn function<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name, Arc::new(f));
        self
    }

    /// Add or replace a filter.
    pub fn filter<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.filters.insert(name, Arc::new(f));
        self
    }

    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }

    /// Invoke a function directly, outside of any template.
    pub fn call(&self, name: &str, args: &HashMap<String, Value>) -> Option<tera::Result<Value>> {
        self.functions.get(name).map(|f| f(args))
    }

    /// Register every entry on `tera`.
    pub(crate) fn bind(&self, tera: &mut Tera) {
        for (name, f) in &self.functions {
            let f = Arc::clone(f);
            tera.register_function(name, move |args: &HashMap<String, Value>| f(args));
        }
        for (name, f) in &self.filters {
            let f = Arc::clone(f);
            tera.register_filter(name, move |value: &Value, args: &HashMap<String, Value>| {
                f(value, args)
            });
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn string_filter(
    name: &'static str,
    transform: fn(&str) -> String,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static {
    move |value: &Value, _args: &HashMap<String, Value>| match value.as_str() {
        Some(s) => Ok(Value::String(transform(s))),
        None => Err(tera::Error::msg(format!(
            "filter `{name}` expects a string, got {value}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Data a template is executed against.
pub trait RenderContext: Serialize {
    /// Short description used in logs (`project`, `phase build`).
    fn describe(&self) -> String;

    /// Functions and filters bound for this render.
    fn functions(&self) -> FunctionTable;
}

/// Facts about one phase that capability functions answer from.
#[derive(Debug, Clone)]
struct PhaseFacts {
    has_inputs: bool,
    has_outputs: bool,
    worker_package: String,
    worker_import_path: String,
}

fn phase_facts(model: &DerivedModel) -> Arc<BTreeMap<String, PhaseFacts>> {
    let facts = model
        .phases()
        .map(|p| {
            let facts = PhaseFacts {
                has_inputs: p.has_inputs(),
                has_outputs: p.has_outputs(),
                worker_package: p.worker_package(),
                worker_import_path: p.worker_import_path(),
            };
            (p.name.0.clone(), facts)
        })
        .collect();
    Arc::new(facts)
}

/// Build the phase capability functions. `current` is the phase used when
/// a call omits `phase=`; without it the argument is required.
fn capability_table(
    facts: Arc<BTreeMap<String, PhaseFacts>>,
    current: Option<String>,
) -> FunctionTable {
    let mut table = FunctionTable::with_naming_filters();
    let queries: [(&'static str, fn(&PhaseFacts) -> Value); 4] = [
        ("has_inputs", |f| Value::Bool(f.has_inputs)),
        ("has_outputs", |f| Value::Bool(f.has_outputs)),
        ("worker_package", |f| Value::String(f.worker_package.clone())),
        ("worker_import_path", |f| Value::String(f.worker_import_path.clone())),
    ];
    for (name, query) in queries {
        let facts = Arc::clone(&facts);
        let current = current.clone();
        table = table.function(name, move |args: &HashMap<String, Value>| {
            let phase = match args.get("phase") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    return Err(tera::Error::msg(format!(
                        "`{name}`: `phase` must be a string, got {other}"
                    )))
                }
                None => current.clone().ok_or_else(|| {
                    tera::Error::msg(format!("`{name}` requires a `phase` argument"))
                })?,
            };
            facts
                .get(&phase)
                .map(query)
                .ok_or_else(|| tera::Error::msg(format!("`{name}`: unknown phase '{phase}'")))
        });
    }
    table
}

impl RenderContext for DerivedModel {
    fn describe(&self) -> String {
        "project".to_string()
    }

    fn functions(&self) -> FunctionTable {
        capability_table(phase_facts(self), None)
    }
}

impl RenderContext for BoundPhase<'_> {
    fn describe(&self) -> String {
        format!("phase {}", self.name)
    }

    fn functions(&self) -> FunctionTable {
        capability_table(phase_facts(self.project()), Some(self.name.0.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
