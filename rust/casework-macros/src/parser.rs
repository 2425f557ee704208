//! `#[case(...)]` argument and signature parser using unsynn.

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote_spanned;
use unsynn::operator::names::{Assign, Lt, Pound};
use unsynn::{
    Any, BracketGroupContaining, CommaDelimitedVec, Cons, EndOfStream, Ident, Literal,
    LiteralString, ParenthesisGroupContaining, Parse, ToTokenIter, TokenStream, keyword, unsynn,
};

keyword! {
    pub KAsync = "async";
    pub KConst = "const";
    pub KExtern = "extern";
    pub KFn = "fn";
    pub KPub = "pub";
    pub KUnsafe = "unsafe";
}

unsynn! {
    pub enum ArgValue {
        Quoted(LiteralString),
        Other(Literal),
    }

    pub struct CaseArg {
        pub key: Ident,
        pub _assign: Assign,
        pub value: ArgValue,
    }

    pub struct CaseArgList {
        pub args: CommaDelimitedVec<CaseArg>,
        pub _eos: EndOfStream,
    }

    pub struct RawAttribute {
        pub _pound: Pound,
        pub body: BracketGroupContaining<TokenStream>,
    }

    pub enum Visibility {
        PubRestricted(Cons<KPub, ParenthesisGroupContaining<TokenStream>>),
        Pub(KPub),
    }

    pub enum Qualifier {
        Async(KAsync),
        Const(KConst),
        Unsafe(KUnsafe),
        Extern(Cons<KExtern, Option<LiteralString>>),
    }

    pub enum Signature {
        Generic(Cons<Lt, TokenStream>),
        Params(Cons<ParenthesisGroupContaining<TokenStream>, TokenStream>),
    }

    pub struct FnHeader {
        pub attributes: Any<RawAttribute>,
        pub vis: Option<Visibility>,
        pub qualifiers: Any<Qualifier>,
        pub _fn: KFn,
        pub name: Ident,
        pub signature: Signature,
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    pub span: Span,
    pub message: String,
}

impl Error {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn to_compile_error(&self) -> TokenStream2 {
        let msg = &self.message;
        let span = self.span;
        quote_spanned! {span=> ::core::compile_error!(#msg); }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct CaseArgs {
    pub suite: String,
    pub name: Option<String>,
}

pub fn parse_args(tokens: &TokenStream2) -> Result<CaseArgs> {
    let mut iter = tokens.clone().to_token_iter();
    let parsed = CaseArgList::parse(&mut iter).map_err(|_| {
        Error::new(
            Span::call_site(),
            "expected `suite = \"...\"` and optionally `name = \"...\"`",
        )
    })?;

    let mut suite = None;
    let mut name = None;

    for entry in parsed.args {
        let arg = entry.value;
        let key = arg.key.to_string();
        let slot = match key.as_str() {
            "suite" => &mut suite,
            "name" => &mut name,
            other => {
                return Err(Error::new(
                    arg.key.span(),
                    format!("unknown argument `{other}`, expected `suite` or `name`"),
                ));
            }
        };
        if slot.is_some() {
            return Err(Error::new(
                arg.key.span(),
                format!("duplicate argument `{key}`"),
            ));
        }

        let value = string_value(&arg.value)?;
        if value.is_empty() {
            return Err(Error::new(arg.key.span(), format!("`{key}` must not be empty")));
        }
        *slot = Some(value);
    }

    let suite = suite.ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "missing `suite = \"...\"` in #[case(...)]",
        )
    })?;

    Ok(CaseArgs { suite, name })
}

/// Decoded contents of a string literal, plain or raw.
fn string_value(value: &ArgValue) -> Result<String> {
    match value {
        ArgValue::Quoted(lit) => unescape(lit.as_str())
            .ok_or_else(|| Error::new(Span::call_site(), "invalid escape in string literal")),
        ArgValue::Other(lit) => raw_string(&lit.to_string())
            .ok_or_else(|| Error::new(lit.span(), "expected a string literal")),
    }
}

/// `r"..."` and `r#"..."#`; raw strings have no escapes.
fn raw_string(repr: &str) -> Option<String> {
    let rest = repr.strip_prefix('r')?;
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    let fence = "#".repeat(hashes);
    let inner = rest
        .strip_prefix(fence.as_str())?
        .strip_prefix('"')?
        .strip_suffix(fence.as_str())?
        .strip_suffix('"')?;
    Some(inner.to_string())
}

fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16).ok().filter(u8::is_ascii)?;
                out.push(char::from(byte));
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                let code = u32::from_str_radix(&hex.replace('_', ""), 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            '\n' => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
            }
            _ => return None,
        }
    }

    Some(out)
}

pub fn parse_fn_name(tokens: &TokenStream2) -> Result<Ident> {
    let mut iter = tokens.clone().to_token_iter();
    let header = FnHeader::parse(&mut iter).map_err(|_| {
        Error::new(
            Span::call_site(),
            "#[case] can only be applied to functions",
        )
    })?;

    for qualifier in header.qualifiers {
        if let Qualifier::Async(_) = qualifier.value {
            return Err(Error::new(
                header.name.span(),
                "#[case] functions must be synchronous",
            ));
        }
    }

    match header.signature {
        Signature::Generic(_) => Err(Error::new(
            header.name.span(),
            "#[case] functions cannot be generic",
        )),
        Signature::Params(params) if !params.first.content.is_empty() => Err(Error::new(
            header.name.span(),
            "#[case] functions take no arguments",
        )),
        Signature::Params(_) => Ok(header.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(src: &str) -> Result<CaseArgs> {
        let ts: TokenStream2 = src.parse().expect("tokenize");
        parse_args(&ts)
    }

    fn suite(src: &str) -> String {
        match args(src) {
            Ok(args) => args.suite,
            Err(err) => panic!("{src}: {}", err.message),
        }
    }

    fn error(src: &str) -> String {
        match args(src) {
            Ok(_) => panic!("{src}: expected an error"),
            Err(err) => err.message,
        }
    }

    fn fn_name(src: &str) -> Result<String> {
        let ts: TokenStream2 = src.parse().expect("tokenize");
        parse_fn_name(&ts).map(|ident| ident.to_string())
    }

    #[test]
    fn parse_suite_and_name() {
        let parsed = args(r#"suite = "Expect", name = "Throw""#).expect("parse_args");
        assert_eq!(parsed.suite, "Expect");
        assert_eq!(parsed.name.as_deref(), Some("Throw"));

        let parsed = args(r#"name = "eq", suite = "Assert","#).expect("parse_args");
        assert_eq!(parsed.suite, "Assert");
        assert_eq!(parsed.name.as_deref(), Some("eq"));
    }

    #[test]
    fn string_values_are_decoded() {
        assert_eq!(suite(r#"suite = "Plain""#), "Plain");
        assert_eq!(suite(r#"suite = r"Raw""#), "Raw");
        assert_eq!(suite(r##"suite = r#"Hash "quoted""#"##), "Hash \"quoted\"");
        assert_eq!(suite(r#"suite = "Tab\tName""#), "Tab\tName");
        assert_eq!(suite(r#"suite = "Quote\"d""#), "Quote\"d");
        assert_eq!(suite(r#"suite = "caf\u{e9}""#), "café");
        assert_eq!(suite(r#"suite = "\x41\\B""#), "A\\B");
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert_eq!(error(""), "missing `suite = \"...\"` in #[case(...)]");
        assert_eq!(error(r#"name = "x""#), "missing `suite = \"...\"` in #[case(...)]");
        assert_eq!(error(r#"suite = """#), "`suite` must not be empty");
        assert_eq!(error(r#"suite = "S", name = r"""#), "`name` must not be empty");
        assert_eq!(
            error(r#"suite = "S", tag = "x""#),
            "unknown argument `tag`, expected `suite` or `name`"
        );
        assert_eq!(error(r#"suite = "S", suite = "T""#), "duplicate argument `suite`");
        assert_eq!(error("suite = 3"), "expected a string literal");
        assert!(error("suite").starts_with("expected `suite"));
    }

    #[test]
    fn parse_plain_fn_headers() {
        assert_eq!(fn_name("fn eq() -> CaseResult { Ok(()) }").ok().as_deref(), Some("eq"));
        assert_eq!(
            fn_name("#[doc = \" docs\"] pub(crate) fn r#loop() -> CaseResult { Ok(()) }")
                .ok()
                .as_deref(),
            Some("r#loop")
        );
        assert_eq!(
            fn_name("pub unsafe fn raw() -> CaseResult { Ok(()) }").ok().as_deref(),
            Some("raw")
        );
    }

    #[test]
    fn unsupported_fn_headers_are_rejected() {
        let message = |src: &str| fn_name(src).err().map(|e| e.message);
        assert_eq!(
            message("async fn later() -> CaseResult { Ok(()) }").as_deref(),
            Some("#[case] functions must be synchronous")
        );
        assert_eq!(
            message("fn with(x: u32) -> CaseResult { Ok(()) }").as_deref(),
            Some("#[case] functions take no arguments")
        );
        assert_eq!(
            message("fn generic<T>() -> CaseResult { Ok(()) }").as_deref(),
            Some("#[case] functions cannot be generic")
        );
        assert_eq!(
            message("struct NotAFn;").as_deref(),
            Some("#[case] can only be applied to functions")
        );
    }
}
