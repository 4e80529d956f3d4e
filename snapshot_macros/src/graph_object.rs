//! `GraphObject` derive macro implementation

use heck::ToKebabCase;
use heck::ToLowerCamelCase;
use heck::ToShoutySnakeCase;
use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Data;
use syn::DeriveInput;
use syn::Fields;
use syn::LitStr;
use syn::parse_macro_input;

/// Case conversion applied to field names without an explicit `rename`
#[derive(Clone, Copy)]
enum RenameRule {
    LowerCamel,
    UpperCamel,
    Snake,
    Kebab,
    ShoutySnake,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::LowerCamel),
            "PascalCase" => Ok(Self::UpperCamel),
            "snake_case" => Ok(Self::Snake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ShoutySnake),
            other => Err(syn::Error::new(
                lit.span(),
                format!(
                    "unknown rename_all rule `{other}`; expected camelCase, PascalCase, \
                     snake_case, kebab-case or SCREAMING_SNAKE_CASE"
                ),
            )),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCamel => name.to_lower_camel_case(),
            Self::UpperCamel => name.to_upper_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ShoutySnake => name.to_shouty_snake_case(),
        }
    }
}

/// Container-level `#[graph(...)]` settings
#[derive(Default)]
struct ContainerAttrs {
    type_name:  Option<String>,
    extends:    Vec<String>,
    rename_all: Option<RenameRule>,
}

/// Field-level `#[graph(...)]` settings
#[derive(Default)]
struct FieldAttrs {
    skip:       bool,
    visibility: Option<bool>,
    rename:     Option<String>,
    getter:     Option<syn::Ident>,
}

/// One field that ends up in the descriptor table
struct GraphField {
    name:      String,
    is_public: bool,
    read:      TokenStream2,
}

/// Implementation of the `GraphObject` derive macro
pub fn derive_graph_object_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "GraphObject cannot be derived for generic types; implement it by hand",
        ));
    }

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "GraphObject can only be derived for structs",
        ));
    };

    let container = parse_container_attrs(input)?;
    let type_name = container
        .type_name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());
    let extends = &container.extends;

    let fields = match &data_struct.fields {
        Fields::Named(named) => collect_fields(named.named.iter(), &container)?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "GraphObject requires named fields",
            ));
        },
    };

    let descriptors = fields.iter().map(|field| {
        let name = &field.name;
        let visibility = if field.is_public {
            quote! { ::graph_snapshot::Visibility::Public }
        } else {
            quote! { ::graph_snapshot::Visibility::Private }
        };
        quote! { .field(#name, #visibility) }
    });

    let reads = fields.iter().enumerate().map(|(index, field)| {
        let read = &field.read;
        quote! { #index => #read, }
    });

    Ok(quote! {
        impl ::graph_snapshot::GraphObject for #struct_name {
            fn type_info(&self) -> &::graph_snapshot::TypeInfo {
                static TYPE_INFO: ::std::sync::LazyLock<::graph_snapshot::TypeInfo> =
                    ::std::sync::LazyLock::new(|| {
                        ::graph_snapshot::TypeInfo::builder(#type_name)
                            #(.extends(#extends))*
                            #(#descriptors)*
                            .build()
                    });
                &TYPE_INFO
            }

            fn field(
                &self,
                index: usize,
            ) -> ::graph_snapshot::Result<::graph_snapshot::Slot> {
                match index {
                    #(#reads)*
                    _ => ::std::result::Result::Err(
                        ::graph_snapshot::Error::field_index(
                            ::graph_snapshot::GraphObject::type_info(self).name(),
                            index,
                        )
                        .into(),
                    ),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any { self }
        }
    })
}

fn collect_fields<'a>(
    fields: impl Iterator<Item = &'a syn::Field>,
    container: &ContainerAttrs,
) -> syn::Result<Vec<GraphField>> {
    let mut collected = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        let rust_name = ident.to_string();
        let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        let name = attrs.rename.unwrap_or_else(|| {
            container
                .rename_all
                .map_or_else(|| rust_name.to_string(), |rule| rule.apply(rust_name))
        });
        let is_public = attrs
            .visibility
            .unwrap_or(matches!(field.vis, syn::Visibility::Public(_)));
        let read = attrs.getter.map_or_else(
            || {
                quote! {
                    ::std::result::Result::Ok(::graph_snapshot::ToSlot::to_slot(&self.#ident))
                }
            },
            |getter| {
                quote! {
                    self.#getter().map(|value| ::graph_snapshot::ToSlot::to_slot(&value))
                }
            },
        );

        collected.push(GraphField {
            name,
            is_public,
            read,
        });
    }
    Ok(collected)
}

fn parse_container_attrs(input: &DeriveInput) -> syn::Result<ContainerAttrs> {
    let mut attrs = ContainerAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("graph")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_name") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.type_name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("extends") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.extends.push(lit.value());
                Ok(())
            } else if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.rename_all = Some(RenameRule::from_lit(&lit)?);
                Ok(())
            } else {
                Err(meta.error("unsupported graph container attribute"))
            }
        })?;
    }
    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("graph")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("public") {
                attrs.visibility = Some(true);
                Ok(())
            } else if meta.path.is_ident("private") {
                attrs.visibility = Some(false);
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("getter") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.getter = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported graph field attribute"))
            }
        })?;
    }
    Ok(attrs)
}
