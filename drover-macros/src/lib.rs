use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Ident, ItemFn, LitInt};

/// Proc macro to denote a Transaction
///
/// A transaction is a single request whose outcome and latency are recorded under the
/// function's name. The function must return a `Result<T, E>`; `Err` counts as a failure.
///
/// # Example
/// ```ignore
/// use drover::prelude::*;
///
/// #[transaction]
/// async fn list_cars(client: &HttpClient, session: &Session) -> Result<Reply, HttpError> {
///     client.send(session.apply(client.get("/car"))).await?.error_for_status()
/// }
/// ```
#[proc_macro_attribute]
pub fn transaction(attr: TokenStream, item: TokenStream) -> TokenStream {
    transaction_internal(attr, item).into()
}

fn transaction_internal(_attr: TokenStream, item: TokenStream) -> TokenStream2 {
    let input = match syn::parse::<ItemFn>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let stmts = &block.stmts;
    let name = &sig.ident;

    quote! {
        #(#attrs)* #vis #sig {
            ::drover::transaction::transaction_hook(::drover::generate_labels!(#name), async move {
                #(#stmts)*
            }).await
        }
    }
}

/// Proc macro to denote a weighted Task
///
/// Turns an `async fn(&mut VirtualUser) -> TaskResult` into a constructor of the same name
/// returning a `drover::task::Task`. The optional argument is the task's weight (default `1`);
/// a task with weight 8 is picked eight times as often as a task with weight 1.
///
/// # Example
/// ```ignore
/// use drover::prelude::*;
///
/// #[task(5)]
/// async fn car_list(user: &mut VirtualUser) -> TaskResult {
///     Ok(())
/// }
///
/// let task_set = TaskSet::new("UserBehavior").register_task(car_list());
/// ```
#[proc_macro_attribute]
pub fn task(attr: TokenStream, item: TokenStream) -> TokenStream {
    task_internal(attr, item).unwrap_or_else(|err| err.to_compile_error()).into()
}

fn task_internal(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream2> {
    let weight = parse_weight(attr)?;
    let input = syn::parse::<ItemFn>(item)?;

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            sig.fn_token,
            "#[task] can only be applied to async functions",
        ));
    }

    let task_name = sig.ident.clone();
    let inner_name = Ident::new(&format!("__drover_{}", sig.ident), Span::call_site());
    let mut inner_sig = sig.clone();
    inner_sig.ident = inner_name.clone();

    let weight = Literal::u32_unsuffixed(weight);

    Ok(quote! {
        #(#attrs)* #vis fn #task_name() -> ::drover::task::Task {
            const WEIGHT: ::std::num::NonZeroU32 = match ::std::num::NonZeroU32::new(#weight) {
                Some(weight) => weight,
                None => panic!("task weight must be non-zero"),
            };
            ::drover::task::Task::new(stringify!(#task_name), |user| {
                ::std::boxed::Box::pin(#inner_name(user))
            })
            .with_weight(WEIGHT)
        }

        #[doc(hidden)]
        #inner_sig #block
    })
}

fn parse_weight(attr: TokenStream) -> syn::Result<u32> {
    if attr.is_empty() {
        return Ok(1);
    }

    let lit = syn::parse::<LitInt>(attr)?;
    let weight = lit.base10_parse::<u32>()?;
    if weight == 0 {
        return Err(syn::Error::new(
            lit.span(),
            "task weight must be greater than zero",
        ));
    }
    Ok(weight)
}
