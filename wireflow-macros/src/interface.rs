use proc_macro2::TokenStream;
use quote::quote;
use syn::{ItemTrait, TraitItem, TypeParamBound, parse_quote};

fn has_supertrait(item: &ItemTrait, name: &str) -> bool {
    item.supertraits.iter().any(|bound| match bound {
        TypeParamBound::Trait(t) => t.path.segments.last().is_some_and(|s| s.ident == name),
        _ => false,
    })
}

pub fn expand(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> Result<proc_macro::TokenStream, proc_macro::TokenStream> {
    expand_tokens(attr.into(), item.into())
        .map(Into::into)
        .map_err(|e| e.into_compile_error().into())
}

fn expand_tokens(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[interface] takes no arguments"));
    }

    let mut item: ItemTrait = syn::parse2(item)?;

    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[interface] traits cannot be generic",
        ));
    }

    let assoc_type = item.items.iter().find_map(|item| match item {
        TraitItem::Type(assoc) => Some(assoc),
        _ => None,
    });
    if let Some(assoc) = assoc_type {
        return Err(syn::Error::new_spanned(
            assoc,
            "#[interface] traits cannot have associated types",
        ));
    }

    let required = item
        .items
        .iter()
        .any(|item| matches!(item, TraitItem::Fn(f) if f.default.is_none()));
    if !required {
        return Err(syn::Error::new_spanned(
            &item.ident,
            "#[interface] traits must declare at least one method without a default body",
        ));
    }

    if item.colon_token.is_none() {
        item.colon_token = Some(Default::default());
    }
    if !has_supertrait(&item, "Send") {
        item.supertraits.push(parse_quote!(::core::marker::Send));
    }
    if !has_supertrait(&item, "Sync") {
        item.supertraits.push(parse_quote!(::core::marker::Sync));
    }

    let ident = &item.ident;
    Ok(quote! {
        #item

        impl ::wireflow::Interface for dyn #ident {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_err(item: TokenStream) -> String {
        expand_tokens(TokenStream::new(), item).unwrap_err().to_string()
    }

    #[test]
    fn adds_marker_impl_and_thread_bounds() {
        let expanded = expand_tokens(
            TokenStream::new(),
            quote! {
                trait Mailer {
                    fn send(&self, to: &str);
                }
            },
        )
        .unwrap();

        let item: ItemTrait = syn::parse2(quote! {
            trait Mailer: ::core::marker::Send + ::core::marker::Sync {
                fn send(&self, to: &str);
            }
        })
        .unwrap();
        let expected = quote! {
            #item

            impl ::wireflow::Interface for dyn Mailer {}
        };
        assert_eq!(expanded.to_string(), expected.to_string());
    }

    #[test]
    fn keeps_existing_send_sync() {
        let expanded = expand_tokens(
            TokenStream::new(),
            quote! {
                trait Mailer: Send + Sync {
                    fn send(&self, to: &str);
                }
            },
        )
        .unwrap()
        .to_string();

        assert!(!expanded.contains(":: core :: marker :: Send"));
    }

    #[test]
    fn rejects_associated_types() {
        let message = expand_err(quote! {
            trait Store {
                type Key;
                fn get(&self, key: Self::Key);
            }
        });
        assert!(message.contains("associated types"));
    }

    #[test]
    fn rejects_generic_traits() {
        let message = expand_err(quote! {
            trait Store<K> {
                fn get(&self, key: K);
            }
        });
        assert!(message.contains("cannot be generic"));
    }

    #[test]
    fn rejects_traits_without_required_methods() {
        let message = expand_err(quote! {
            trait Defaults {
                fn noop(&self) {}
            }
        });
        assert!(message.contains("at least one method"));
    }

    #[test]
    fn rejects_arguments() {
        let err = expand_tokens(quote!(strict), quote! { trait Mailer { fn send(&self); } })
            .unwrap_err();
        assert!(err.to_string().contains("takes no arguments"));
    }
}
