use darling::{FromDeriveInput, FromField, ast};
use quote::quote;
use syn::{DeriveInput, Ident, Type};

type Result<T> = std::result::Result<T, proc_macro::TokenStream>;

#[derive(Debug, FromField)]
#[darling(attributes(inject))]
struct InjectField {
    ident: Option<Ident>,
    ty: Type,
    #[darling(default)]
    name: Option<String>,
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(inject), supports(struct_named, struct_unit))]
struct InjectInput {
    ident: Ident,
    generics: syn::Generics,
    data: ast::Data<darling::util::Ignored, InjectField>,
}

pub fn derive(input: proc_macro::TokenStream) -> Result<proc_macro::TokenStream> {
    let input: DeriveInput = syn::parse(input).map_err(|e| proc_macro::TokenStream::from(e.to_compile_error()))?;
    let input = InjectInput::from_derive_input(&input).map_err(|e| proc_macro::TokenStream::from(e.write_errors()))?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = input
        .data
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let mut bindings = Vec::with_capacity(fields.len());
    for field in &fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;

        if let Some(binding_name) = field.name.as_deref()
            && binding_name.is_empty()
        {
            return Err(syn::Error::new_spanned(ident, "#[inject(name)] must not be empty")
                .into_compile_error()
                .into());
        }

        let selector = match &field.name {
            Some(binding_name) => quote!(::core::option::Option::Some(#binding_name)),
            None => quote!(::core::option::Option::None),
        };

        bindings.push(quote! {
            #ident: <#ty as ::wireflow::FromContainer>::from_container(container, #selector).await?
        });
    }

    let expanded = quote! {
        #[::wireflow::async_trait]
        impl #impl_generics ::wireflow::Inject for #name #ty_generics #where_clause {
            async fn inject(
                container: &::wireflow::DIContainer,
            ) -> ::wireflow::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#bindings),*
                })
            }
        }
    };

    Ok(expanded.into())
}
