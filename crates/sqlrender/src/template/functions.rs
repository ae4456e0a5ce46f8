//! Per-render MiniJinja environment and the `bind`/`identifier` functions.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value};

use crate::binder::ArgumentBinder;

/// Callables made available to templates, keyed by name.
///
/// Values are created with [`Value::from_function`].
pub type FunctionTable = BTreeMap<String, Value>;

/// A binder shared between the render call and the functions it registers.
pub(crate) type SharedBinder = Arc<Mutex<ArgumentBinder>>;

pub(crate) fn lock(binder: &SharedBinder) -> MutexGuard<'_, ArgumentBinder> {
    binder.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds a fresh environment for one render.
///
/// Custom functions go in first and the binder functions last, so `bind` and
/// `identifier` always refer to this render's binder even if a custom
/// function was registered under the same name.
pub(crate) fn build_environment(custom: &FunctionTable, binder: &SharedBinder) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for (name, function) in custom {
        env.add_global(name.clone(), function.clone());
    }
    register_binder_functions(&mut env, binder);
    env
}

/// Registers `bind` and `identifier` on `env`, both backed by `binder`.
///
/// - `{{ bind(value) }}` appends to the binder and emits placeholder text.
/// - `{{ identifier(name) }}` emits a quoted identifier, or aborts the render
///   with an [`InvalidIdentifier`](crate::InvalidIdentifier) source attached.
pub(crate) fn register_binder_functions(env: &mut Environment<'_>, binder: &SharedBinder) {
    let shared = Arc::clone(binder);
    env.add_function("bind", move |value: Value| -> Result<String, Error> {
        Ok(lock(&shared).bind(value))
    });

    let shared = Arc::clone(binder);
    env.add_function("identifier", move |name: Value| -> Result<String, Error> {
        lock(&shared).identifier(&name).map_err(|invalid| {
            Error::new(ErrorKind::InvalidOperation, invalid.to_string()).with_source(invalid)
        })
    });
}
