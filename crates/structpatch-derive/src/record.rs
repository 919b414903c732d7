use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Visibility};

use crate::attr::FieldAttrs;

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let type_name = ident.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let mut descriptors = Vec::new();
    let mut getters = Vec::new();
    let mut setters = Vec::new();

    // private fields are not externally visible and get no slot
    let visible = fields
        .iter()
        .filter(|field| !matches!(field.vis, Visibility::Inherited));

    for (index, field) in visible.enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(Error::new_spanned(field, "expected a named field"));
        };
        let declared = field_ident.to_string();
        let declared = declared.strip_prefix("r#").unwrap_or(&declared).to_string();
        let ty = &field.ty;
        let attrs = FieldAttrs::parse(&field.attrs)?;

        let mut descriptor = if attrs.skip {
            // skipped fields need not implement FieldValue
            quote! {
                ::structpatch::FieldDescriptor::new(
                    #declared,
                    ::structpatch::FieldKind::Leaf,
                    false,
                )
                .skip()
            }
        } else {
            quote! {
                ::structpatch::FieldDescriptor::new(
                    #declared,
                    <#ty as ::structpatch::FieldValue>::KIND,
                    <#ty as ::structpatch::FieldValue>::NULLABLE,
                )
            }
        };
        if let Some(rename) = &attrs.rename {
            descriptor = quote! { #descriptor.rename(#rename) };
        }
        if attrs.omit_empty {
            descriptor = quote! { #descriptor.omit_empty() };
        }
        descriptors.push(descriptor);

        if !attrs.skip {
            getters.push(quote! {
                #index => ::core::option::Option::Some(
                    ::structpatch::FieldValue::to_value(&self.#field_ident),
                ),
            });
            setters.push(quote! {
                #index => {
                    self.#field_ident = ::structpatch::FieldValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            });
        }
    }

    Ok(quote! {
        impl ::structpatch::Record for #ident {
            fn catalog(&self) -> &'static ::structpatch::FieldCatalog {
                static CATALOG: ::structpatch::FieldCatalog =
                    ::structpatch::FieldCatalog::new(#type_name, &[#(#descriptors),*]);
                &CATALOG
            }

            fn get_field(&self, index: usize) -> ::core::option::Option<::structpatch::Value> {
                match index {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                index: usize,
                value: ::structpatch::Value,
            ) -> ::core::result::Result<(), ::structpatch::CoerceError> {
                match index {
                    #(#setters)*
                    _ => ::core::result::Result::Err(::structpatch::CoerceError::Mismatch {
                        expected: "field slot",
                        found: "unknown index",
                    }),
                }
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn ::structpatch::Record> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }
        }

        impl ::structpatch::FieldValue for #ident {
            const KIND: ::structpatch::FieldKind = ::structpatch::FieldKind::Record;

            fn to_value(&self) -> ::structpatch::Value {
                ::structpatch::Value::Record(::std::boxed::Box::new(
                    ::core::clone::Clone::clone(self),
                ))
            }

            fn from_value(
                value: ::structpatch::Value,
            ) -> ::core::result::Result<Self, ::structpatch::CoerceError> {
                ::structpatch::__private::record_from_value::<Self>(value)
            }
        }
    })
}
