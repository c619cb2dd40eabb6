// Copyright (c) 2025 - Cowboy AI, LLC.

//! Shared builders for the composite depth tests and benchmarks.

use cim_mixin::{compose, MixinResult, TypeDescriptor, Value};

/// Plain type declaring `method{prefix}1..=3`, each returning `"{prefix}{i}"`
pub fn plain(name: &str, parent: Option<&TypeDescriptor>, prefix: &str) -> TypeDescriptor {
    let mut builder = TypeDescriptor::builder(name);
    if let Some(parent) = parent {
        builder = builder.extends(parent);
    }
    for i in 1..=3 {
        let result = format!("{prefix}{i}");
        builder = builder.method(format!("method{prefix}{i}"), move |_, _| {
            Ok(Value::from(result.clone()))
        });
    }
    builder.build()
}

/// Type extending the composite of `constituents` with one `{name}Method`
pub fn level(name: &str, constituents: &[TypeDescriptor]) -> MixinResult<TypeDescriptor> {
    let tag = name.to_string();
    Ok(TypeDescriptor::builder(name)
        .extends(&compose(constituents)?)
        .method(format!("{}Method", name.to_lowercase()), move |_, _| {
            Ok(Value::from(tag.clone()))
        })
        .build())
}
