//! Proc macros for casework.
//!
//! Provides `#[case(suite = "...")]`, which leaves the annotated function
//! untouched and submits a `casework::CaseEntry` for it through `inventory`.
//! Discovery therefore happens at link time, and the process-wide registry
//! picks the entries up the first time it is touched.
//!
//! ```ignore
//! use casework::prelude::*;
//!
//! #[case(suite = "Expect")]
//! fn eq() -> CaseResult {
//!     expect_eq!(1, 1)?;
//!     Ok(())
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::{Ident, Literal, TokenStream as TokenStream2};
use quote::quote;

mod parser;

use parser::{parse_args, parse_fn_name};

/// Declare a test case.
///
/// Arguments:
/// - `suite = "Name"` (required): the suite the case belongs to.
/// - `name = "name"` (optional): the case name, defaults to the function name.
///
/// Values are ordinary or raw string literals and may not be empty. The
/// function must be synchronous, non-generic, take no arguments, and return
/// `casework::CaseResult`.
#[proc_macro_attribute]
pub fn case(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = TokenStream2::from(attr);
    let item = TokenStream2::from(item);

    match expand(&attr, &item) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let error = err.to_compile_error();
            quote! {
                #item
                #error
            }
            .into()
        }
    }
}

fn expand(attr: &TokenStream2, item: &TokenStream2) -> parser::Result<TokenStream2> {
    let args = parse_args(attr)?;
    let ident = parse_fn_name(item)?;

    let suite = Literal::string(&args.suite);
    let name = Literal::string(&args.name.unwrap_or_else(|| unraw(&ident)));

    Ok(quote! {
        #item

        ::casework::inventory::submit! {
            ::casework::CaseEntry {
                suite: #suite,
                name: #name,
                body: #ident,
                file: ::core::file!(),
                line: ::core::line!(),
                column: ::core::column!(),
            }
        }
    })
}

fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
