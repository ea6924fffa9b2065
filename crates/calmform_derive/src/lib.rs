use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

/// Derives `calmform::form::FormModel` for a struct of text fields.
///
/// Every named field becomes a lens type `{Model}{Field}Lens` reachable through
/// `{Model}::fields().{field}()`. Field types must implement `AsRef<str>` and
/// `From<String>`. `#[form(rename = "birthDate")]` overrides the field key.
#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let calmform = calmform_path();
    let mut lens_defs = Vec::new();
    let mut fields_methods = Vec::new();
    let mut keys = Vec::new();
    let mut read_arms = Vec::new();
    let mut write_arms = Vec::new();

    for field in named_fields {
        let field_key = match field_key(&field) {
            Ok(key) => key,
            Err(error) => return error.to_compile_error().into(),
        };
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let field_name = field_ident.to_string();
        let lens_ident = format_ident!("{model_ident}{}Lens", to_pascal_case(&field_name));
        let field_key = field_key.unwrap_or(field_name);

        lens_defs.push(quote! {
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #lens_ident;

            impl #calmform::form::FieldLens<#model_ident> for #lens_ident {
                type Value = #field_ty;

                fn key(self) -> #calmform::form::FieldKey {
                    #calmform::form::FieldKey::new(#field_key)
                }

                fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                    &model.#field_ident
                }

                fn set(self, model: &mut #model_ident, value: Self::Value) {
                    model.#field_ident = value;
                }
            }
        });

        fields_methods.push(quote! {
            pub const fn #field_ident(&self) -> #lens_ident {
                #lens_ident
            }
        });

        keys.push(quote! { #calmform::form::FieldKey::new(#field_key) });
        read_arms.push(quote! {
            #field_key => ::core::option::Option::Some(
                ::core::convert::AsRef::<str>::as_ref(&self.#field_ident),
            ),
        });
        write_arms.push(quote! {
            #field_key => {
                self.#field_ident = ::core::convert::From::from(value);
                true
            }
        });
    }

    quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#fields_methods)*
        }

        impl #calmform::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn field_keys() -> &'static [#calmform::form::FieldKey] {
                const KEYS: &[#calmform::form::FieldKey] = &[#(#keys),*];
                KEYS
            }

            fn field_text(&self, key: #calmform::form::FieldKey) -> ::core::option::Option<&str> {
                match key.as_str() {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field_text(
                &mut self,
                key: #calmform::form::FieldKey,
                value: ::std::string::String,
            ) -> bool {
                match key.as_str() {
                    #(#write_arms)*
                    _ => false,
                }
            }
        }

        #(#lens_defs)*
    }
    .into()
}

fn field_key(field: &Field) -> syn::Result<Option<String>> {
    let mut key = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                key = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported form attribute, expected `rename`"))
            }
        })?;
    }
    Ok(key)
}

fn calmform_path() -> TokenStream2 {
    match crate_name("calmform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::calmform),
    }
}

fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    for segment in input.split('_') {
        if segment.is_empty() {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
