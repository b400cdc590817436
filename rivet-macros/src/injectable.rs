//! Derive for the `Injectable` shape table

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Visibility};

/// Expands `#[derive(Injectable)]` into the `Injectable` and `Resolvable`
/// impls for a struct.
pub(super) fn expand_injectable(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Injectable cannot be derived for generic types",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Injectable can only be derived for structs",
        ));
    };

    let shape = match &data.fields {
        Fields::Unit => expand_unit(name),
        Fields::Named(fields) => expand_named(name, fields),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Injectable cannot be derived for tuple structs",
            ));
        }
    };

    Ok(quote! {
        impl ::rivet_di::Injectable for #name {
            fn shape() -> ::rivet_di::TypeShape {
                #shape
            }
        }

        impl ::rivet_di::Resolvable for #name {
            fn register_shape(catalog: &mut ::rivet_di::TypeCatalog) {
                catalog.register::<#name>();
            }
        }
    })
}

fn expand_unit(name: &Ident) -> TokenStream {
    quote! {
        ::rivet_di::TypeShape::of::<#name>().with_constructor(
            0,
            |__injector: &::rivet_di::Injector|
                -> ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::rivet_di::Error>
            {
                ::core::result::Result::Ok(::std::boxed::Box::new(#name))
            },
        )
    }
}

fn expand_named(name: &Ident, fields: &FieldsNamed) -> TokenStream {
    let mut arity = 0usize;
    let mut initializers = Vec::new();
    let mut properties = Vec::new();

    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        if is_injected(field) {
            initializers.push(quote! { #ident: ::core::default::Default::default() });
            properties.push(expand_property(name, field, ident));
        } else {
            let resolve = resolve_expr(&field.ty);
            initializers.push(quote! { #ident: #resolve });
            arity += 1;
        }
    }

    quote! {
        ::rivet_di::TypeShape::of::<#name>().with_constructor(
            #arity,
            |__injector: &::rivet_di::Injector|
                -> ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::rivet_di::Error>
            {
                ::core::result::Result::Ok(::std::boxed::Box::new(#name {
                    #(#initializers),*
                }))
            },
        )
        #(#properties)*
    }
}

fn expand_property(name: &Ident, field: &Field, ident: &Ident) -> TokenStream {
    let property_name = ident.to_string();
    if !matches!(field.vis, Visibility::Public(_)) {
        return quote! { .with_readonly_property(#property_name) };
    }
    let assign = assign_expr(&field.ty);
    quote! {
        .with_property(
            #property_name,
            |__object: &mut dyn ::core::any::Any, __injector: &::rivet_di::Injector|
                -> ::core::result::Result<(), ::rivet_di::Error>
            {
                let __this = __object
                    .downcast_mut::<#name>()
                    .ok_or(::rivet_di::Error::TypeMismatch(::core::any::type_name::<#name>()))?;
                __this.#ident = #assign;
                ::core::result::Result::Ok(())
            },
        )
    }
}

fn assign_expr(ty: &Type) -> TokenStream {
    if let Some(inner) = generic_argument(ty, "Option") {
        let resolve = resolve_expr(inner);
        quote! { ::core::option::Option::Some(#resolve) }
    } else {
        resolve_expr(ty)
    }
}

fn resolve_expr(ty: &Type) -> TokenStream {
    if let Some(inner) = generic_argument(ty, "Rc") {
        quote! { __injector.resolve_shared::<#inner>()? }
    } else {
        quote! { __injector.resolve::<#ty>()? }
    }
}

/// Matches `Wrapper<T>` by the last path segment and returns `T`.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_injected(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("inject"))
}
