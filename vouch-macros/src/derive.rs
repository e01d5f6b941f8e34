// #[derive(Stringify)]

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{parse_quote, Data, DeriveInput, Fields, Ident, Index};

pub fn expand(mut input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let format = Ident::new("__format", Span::mixed_site());

    let body = match &input.data {
        Data::Struct(data) => {
            let label = name.to_string();
            let build = build_fields(&label, &data.fields, &format, |member| {
                quote!(&self.#member)
            });
            quote!(#build)
        }
        Data::Enum(data) => {
            if data.variants.is_empty() {
                quote!(match *self {})
            } else {
                let arms = data.variants.iter().map(|variant| {
                    let ident = &variant.ident;
                    let label = format!("{}::{}", name, ident);
                    let bindings: Vec<Ident> = (0..variant.fields.len())
                        .map(|i| format_ident!("__field_{}", i))
                        .collect();
                    let pattern = match &variant.fields {
                        Fields::Named(fields) => {
                            let names = fields.named.iter().map(|f| &f.ident);
                            quote!(Self::#ident { #(#names: #bindings),* })
                        }
                        Fields::Unnamed(_) => quote!(Self::#ident(#(#bindings),*)),
                        Fields::Unit => quote!(Self::#ident),
                    };
                    let mut position = 0;
                    let build = build_fields(&label, &variant.fields, &format, |_| {
                        let binding = &bindings[position];
                        position += 1;
                        quote!(#binding)
                    });
                    quote!(#pattern => #build,)
                });
                quote! {
                    match self {
                        #(#arms)*
                    }
                }
            }
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Stringify cannot be derived for unions",
            ))
        }
    };

    let type_params: Vec<Ident> = input.generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = input.generics.make_where_clause();
    for param in type_params {
        where_clause
            .predicates
            .push(parse_quote!(#param: ::vouch::Stringify));
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::vouch::Stringify for #name #ty_generics #where_clause {
            fn repr(&self, #format: ::vouch::LiteralFormat) -> ::vouch::Repr {
                #body
            }
        }
    })
}

/// Build the `Repr` for one struct or variant. `access` yields a reference
/// expression for each field in declaration order.
fn build_fields(
    label: &str,
    fields: &Fields,
    format: &Ident,
    mut access: impl FnMut(TokenStream) -> TokenStream,
) -> TokenStream {
    match fields {
        Fields::Named(named) => {
            let entries = named.named.iter().map(|field| {
                let ident = field.ident.as_ref().map(|i| quote!(#i)).unwrap_or_default();
                let text = field.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
                let value = access(ident);
                quote! {
                    (
                        ::std::string::String::from(#text),
                        ::vouch::Stringify::repr(#value, #format),
                    )
                }
            });
            quote!(::vouch::Repr::structure(#label, ::std::vec![#(#entries),*]))
        }
        Fields::Unnamed(unnamed) => {
            let items = (0..unnamed.unnamed.len()).map(|i| {
                let index = Index::from(i);
                let value = access(quote!(#index));
                quote!(::vouch::Stringify::repr(#value, #format))
            });
            quote!(::vouch::Repr::tuple_struct(#label, ::std::vec![#(#items),*]))
        }
        Fields::Unit => quote! {
            {
                let _ = #format;
                ::vouch::Repr::atom(#label)
            }
        },
    }
}
