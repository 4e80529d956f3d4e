//! Procedural macros for `graph_snapshot`

mod graph_object;

use proc_macro::TokenStream;

/// Derives `GraphObject` with a compile-time field descriptor table.
///
/// # Example
///
/// ```ignore
/// #[derive(GraphObject)]
/// #[graph(type_name = "Light", extends = "Component", rename_all = "camelCase")]
/// pub struct Light {
///     pub light_type: String,
///     pub intensity:  f32,
///     shadow_bias:    f32,
///     #[graph(skip)]
///     gpu_handle:     u64,
///     #[graph(getter = "read_range")]
///     range:          f32,
/// }
/// ```
///
/// This will generate:
/// - a `TypeInfo` named `Light` extending `Component`, built once
/// - fields `lightType` and `intensity` as public, `shadowBias` and `range` as private
///   (visibility follows Rust `pub` unless overridden with `#[graph(public)]` or
///   `#[graph(private)]`)
/// - `field(index)` reading `self.light_type` etc. through `ToSlot`, and `range`
///   through `self.read_range()`, which returns `graph_snapshot::Result<T>`
///
/// Container attributes: `type_name`, `extends` (repeatable, most specific first),
/// `rename_all` (`camelCase`, `PascalCase`, `snake_case`, `kebab-case`,
/// `SCREAMING_SNAKE_CASE`).
///
/// Field attributes: `skip`, `public`, `private`, `rename`, `getter`.
#[proc_macro_derive(GraphObject, attributes(graph))]
pub fn derive_graph_object(input: TokenStream) -> TokenStream {
    graph_object::derive_graph_object_impl(input)
}
