use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Wrap a service method in a trace level span.
///
/// Arguments are never recorded since they carry submissions and credentials.
/// Extra span fields can be passed as `#[trace_instrument(key = value, ...)]`.
#[proc_macro_attribute]
pub fn trace_instrument(meta: TokenStream, input: TokenStream) -> TokenStream {
    let meta = proc_macro2::TokenStream::from(meta);
    let fields = if meta.is_empty() {
        quote! {}
    } else {
        quote! { , fields(#meta) }
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(input as ItemFn);

    quote! {
        #[::tracing::instrument(level = "trace", skip_all, ret(level = "trace") #fields)]
        #(#attrs)*
        #vis #sig #block
    }
    .into()
}
