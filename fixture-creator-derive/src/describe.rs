//! Derive macro implementation for the Describe trait
//!
//! The derive turns a struct's named fields into a `TypeSchema` literal. Type
//! names are rendered from the field's path type; anything that is not a
//! path type needs an explicit `#[describe(ty = "...")]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, GenericArgument, Lit,
    LitStr, Meta, MetaNameValue, PathArguments, Result, Type, parse_macro_input,
};

/// Main entry point for the Describe derive macro
pub fn derive_describe_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_describe_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Options collected from `#[describe(...)]` on the struct
#[derive(Default)]
struct ContainerOptions {
    name: Option<String>,
    package: Option<String>,
    imports: Vec<String>,
}

/// Options collected from `#[describe(...)]` on a field
#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    ty: Option<String>,
}

fn generate_describe_impl(input: &DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    input,
                    "Describe derive requires named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Describe derive is not supported for enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Describe derive is not supported for unions",
            ));
        }
    };

    let options = parse_container_attributes(&input.attrs)?;
    let type_name = options.name.unwrap_or_else(|| ident.to_string());
    let package = match options.package {
        Some(package) => quote! { ::std::option::Option::Some(::std::string::String::from(#package)) },
        None => quote! { ::std::option::Option::None },
    };
    let imports = &options.imports;

    let field_schemas = fields
        .iter()
        .map(|field| {
            let (name, ty) = describe_field(field)?;
            Ok(quote! {
                fixture_creator::FieldSchema::new(#name, #ty)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics fixture_creator::Describe for #ident #ty_generics #where_clause {
            fn describe() -> fixture_creator::TypeSchema {
                fixture_creator::TypeSchema {
                    name: ::std::string::String::from(#type_name),
                    package: #package,
                    imports: ::std::vec![#(::std::string::String::from(#imports)),*],
                    fields: ::std::option::Option::Some(::std::vec![#(#field_schemas),*]),
                }
            }
        }
    })
}

/// Reported name and declared type of one field
fn describe_field(field: &Field) -> Result<(String, String)> {
    let options = parse_field_attributes(&field.attrs)?;

    let name = match options.rename {
        Some(rename) => rename,
        None => field
            .ident
            .as_ref()
            .map(|ident| ident.to_string().trim_start_matches("r#").to_string())
            .ok_or_else(|| Error::new_spanned(field, "Describe derive requires named fields"))?,
    };

    let ty = match options.ty {
        Some(ty) => ty,
        None => render_type(&field.ty)?,
    };

    Ok((name, ty))
}

/// Render a path type as a dotted type name, keeping generic arguments
fn render_type(ty: &Type) -> Result<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segments = &type_path.path.segments;
            let base = segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join(".");

            let last = segments
                .last()
                .ok_or_else(|| Error::new_spanned(ty, "empty type path"))?;
            match &last.arguments {
                PathArguments::None => Ok(base),
                PathArguments::AngleBracketed(args) => {
                    let rendered = args
                        .args
                        .iter()
                        .map(|arg| match arg {
                            GenericArgument::Type(inner) => render_type(inner),
                            other => Err(Error::new_spanned(
                                other,
                                "only type arguments can be described; use #[describe(ty = \"...\")]",
                            )),
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(format!("{}<{}>", base, rendered.join(",")))
                }
                PathArguments::Parenthesized(_) => Err(Error::new_spanned(
                    ty,
                    "function types cannot be described; use #[describe(ty = \"...\")]",
                )),
            }
        }
        Type::Group(group) => render_type(&group.elem),
        Type::Paren(paren) => render_type(&paren.elem),
        _ => Err(Error::new_spanned(
            ty,
            "only path types can be described; use #[describe(ty = \"...\")]",
        )),
    }
}

fn parse_container_attributes(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for (key, value) in describe_entries(attrs)? {
        if key.is_ident("name") {
            options.name = Some(value.value());
        } else if key.is_ident("package") {
            options.package = Some(value.value());
        } else if key.is_ident("import") {
            options.imports.push(value.value());
        } else {
            return Err(Error::new_spanned(
                key,
                "Unsupported describe attribute; expected `name`, `package` or `import`",
            ));
        }
    }

    Ok(options)
}

fn parse_field_attributes(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for (key, value) in describe_entries(attrs)? {
        if key.is_ident("rename") {
            options.rename = Some(value.value());
        } else if key.is_ident("ty") {
            options.ty = Some(value.value());
        } else {
            return Err(Error::new_spanned(
                key,
                "Unsupported describe attribute; expected `rename` or `ty`",
            ));
        }
    }

    Ok(options)
}

/// Every `key = "value"` pair inside `#[describe(...)]` attributes
fn describe_entries(attrs: &[Attribute]) -> Result<Vec<(syn::Path, LitStr)>> {
    let mut entries = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("describe")) {
        let Meta::List(list) = &attr.meta else {
            return Err(Error::new_spanned(
                attr,
                "Describe attribute must be a list",
            ));
        };

        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(list.tokens.clone())? {
            match meta {
                Meta::NameValue(MetaNameValue {
                    path,
                    value:
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(lit_str),
                            ..
                        }),
                    ..
                }) => entries.push((path, lit_str)),
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "Describe attribute values must be string literals",
                    ));
                }
            }
        }
    }

    Ok(entries)
}
