mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait from `texcmp-error` for the given struct.
///
/// The information of the error is customized using the `error` attribute:
///
/// ```ignore
/// use texcmp_attrs::ErrorKind;
/// use texcmp_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of input", labels = ["add something here"])]
/// pub struct UnexpectedEof;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | An array of label texts, one for each span of the error, in order.           |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
/// | `note`      | Optional note with extra context, such as a known limitation.                |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the fields of the struct in scope, so they can be used directly in the expression. Tuple
/// structs are not supported.
///
/// The expanded code refers to `ariadne` and `texcmp_error` by name, so both must be
/// dependencies of the crate using the derive, and the `ErrorKind` trait must be in scope.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            #target
        }
    }.into()
}
