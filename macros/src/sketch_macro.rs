//! sketch! macro: parse markup and generate alloy-ui spec builder code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// An attribute value: a string literal or a braced expression.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(LitStr),
    Expr(Expr),
}

/// A parsed attribute: `name="value"` or `name={expr}`. Names may contain
/// dashes (`aria-label`) and may be keywords (`type`).
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub span: Span,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Lit(lit) => lit.value(),
            AttrValue::Expr(_) => "{..}".to_owned(),
        };
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

#[derive(Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(LitStr),
    Expr(Expr),
}

/// A parsed element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children.len())
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

struct SketchInput {
    root: Element,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for SketchInput {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::new(
                Span::call_site(),
                "sketch! macro requires a root element",
            ));
        }
        let root = parse_element(input)?;
        if !input.is_empty() {
            return Err(input.error("sketch! takes a single root element"));
        }
        Ok(SketchInput { root })
    }
}

fn parse_attr_name(input: ParseStream) -> Result<(String, Span)> {
    let first = Ident::parse_any(input)?;
    let span = first.span();
    let mut name = first.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        name.push('-');
        name.push_str(&Ident::parse_any(input)?.to_string());
    }
    Ok((name, span))
}

fn parse_braced_expr(input: ParseStream) -> Result<Expr> {
    let content;
    braced!(content in input);
    content.parse()
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag: Ident = input.parse()?;

    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }
        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_attr_name(input)?;
        input.parse::<Token![=]>()?;
        let value = if input.peek(syn::token::Brace) {
            AttrValue::Expr(parse_braced_expr(input)?)
        } else {
            AttrValue::Lit(input.parse()?)
        };
        attrs.push(Attribute { name, span, value });
    }

    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag: Ident = input.parse()?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(Node::Element(parse_element(input)?));
        } else if input.peek(LitStr) {
            children.push(Node::Text(input.parse()?));
        } else if input.peek(syn::token::Brace) {
            children.push(Node::Expr(parse_braced_expr(input)?));
        } else {
            return Err(input.error(
                "expected a child element, a string, a `{expr}` or `</` to close the parent",
            ));
        }
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Split an inline `style` literal into `(property, value)` pairs.
pub(crate) fn split_styles(style: &str) -> std::result::Result<Vec<(String, String)>, String> {
    style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .map(|decl| match decl.split_once(':') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.trim().to_owned())),
            _ => Err(format!("invalid style declaration `{decl}`")),
        })
        .collect()
}

fn expect_lit<'a>(attr: &'a Attribute) -> Result<&'a LitStr> {
    match &attr.value {
        AttrValue::Lit(lit) => Ok(lit),
        AttrValue::Expr(_) => Err(Error::new(
            attr.span,
            format!("`{}` takes a string literal", attr.name),
        )),
    }
}

/// Generate code for a single element.
fn generate_element(elem: &Element) -> Result<TokenStream> {
    let tag = elem.tag.to_string();
    let mut dom_calls = Vec::new();
    let mut spec_calls = Vec::new();

    for attr in &elem.attrs {
        match attr.name.as_str() {
            "uid" => {
                let val = expect_lit(attr)?;
                spec_calls.push(quote! { .with_uid(#val) });
            }
            "class" => {
                let val = expect_lit(attr)?;
                for class in val.value().split_whitespace() {
                    dom_calls.push(quote! { .with_class(#class) });
                }
            }
            "style" => {
                let val = expect_lit(attr)?;
                let pairs = split_styles(&val.value()).map_err(|msg| Error::new(val.span(), msg))?;
                for (k, v) in pairs {
                    dom_calls.push(quote! { .with_style(#k, #v) });
                }
            }
            "html" => {
                let val = expect_lit(attr)?;
                dom_calls.push(quote! { .with_inner_html(#val) });
            }
            "value" => match &attr.value {
                AttrValue::Lit(val) => dom_calls.push(quote! { .with_value(#val) }),
                AttrValue::Expr(expr) => dom_calls.push(quote! { .with_value(#expr) }),
            },
            "behaviour" => match &attr.value {
                AttrValue::Expr(expr) => spec_calls.push(quote! { .with_behaviour(#expr) }),
                AttrValue::Lit(lit) => {
                    return Err(Error::new(
                        lit.span(),
                        "`behaviour` takes a `{expr}` evaluating to a configured behaviour",
                    ))
                }
            },
            name => match &attr.value {
                AttrValue::Lit(val) => dom_calls.push(quote! { .with_attribute(#name, #val) }),
                AttrValue::Expr(expr) => dom_calls.push(quote! { .with_attribute(#name, #expr) }),
            },
        }
    }

    for child in &elem.children {
        let child_code = match child {
            Node::Element(el) => generate_element(el)?,
            Node::Text(text) => quote! { ::alloy_ui::spec::AlloySpec::text(#text) },
            Node::Expr(expr) => quote! { #expr },
        };
        spec_calls.push(quote! { .with_component(#child_code) });
    }

    Ok(quote! {
        ::alloy_ui::spec::ComponentSpec::new(
            ::alloy_ui::spec::DomSpec::tag(#tag) #(#dom_calls)*
        ) #(#spec_calls)*
    })
}

/// Entry point: generate code for the entire sketch! macro.
pub(crate) fn sketch_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: SketchInput = syn::parse2(input)?;
    generate_element(&parsed.root)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse_root(tokens: TokenStream) -> Result<Element> {
        syn::parse2::<SketchInput>(tokens).map(|s| s.root)
    }

    // -----------------------------------------------------------------------
    // Parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn parse_self_closing_element() {
        let elem = parse_root(quote! { <span class="icon" /> }).unwrap();
        assert_eq!(elem.tag.to_string(), "span");
        assert!(elem.self_closing);
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.attrs[0].name, "class");
    }

    #[test]
    fn parse_dashed_and_keyword_attribute_names() {
        let elem = parse_root(quote! { <input type="text" aria-label="Name" data-x-y="1" /> }).unwrap();
        let names: Vec<&str> = elem.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["type", "aria-label", "data-x-y"]);
    }

    #[test]
    fn parse_mixed_children() {
        let elem = parse_root(quote! {
            <div>
                "hello"
                <span />
                { extra }
            </div>
        })
        .unwrap();
        assert_eq!(elem.children.len(), 3);
        assert!(matches!(elem.children[0], Node::Text(_)));
        assert!(matches!(elem.children[1], Node::Element(_)));
        assert!(matches!(elem.children[2], Node::Expr(_)));
    }

    #[test]
    fn parse_error_mismatched_closing_tag() {
        let err = parse_root(quote! { <div><span /></p> }).unwrap_err().to_string();
        assert!(err.contains("mismatched closing tag"));
    }

    #[test]
    fn parse_error_multiple_roots() {
        let err = parse_root(quote! { <div /> <div /> }).unwrap_err().to_string();
        assert!(err.contains("single root element"));
    }

    #[test]
    fn parse_error_empty() {
        let err = sketch_impl(quote! {}).unwrap_err().to_string();
        assert!(err.contains("requires a root element"));
    }

    // -----------------------------------------------------------------------
    // Code generation tests
    // -----------------------------------------------------------------------

    #[test]
    fn split_styles_accepts_trailing_semicolon() {
        assert_eq!(
            split_styles("color: red; width:1px;").unwrap(),
            vec![
                ("color".to_owned(), "red".to_owned()),
                ("width".to_owned(), "1px".to_owned())
            ]
        );
        assert!(split_styles("nonsense").is_err());
    }

    #[test]
    fn codegen_classes_are_split() {
        let code = sketch_impl(quote! { <button class="btn primary" /> }).unwrap().to_string();
        assert!(code.contains("DomSpec :: tag (\"button\")"));
        assert!(code.contains("with_class (\"btn\")"));
        assert!(code.contains("with_class (\"primary\")"));
    }

    #[test]
    fn codegen_uid_and_behaviour_go_on_the_spec() {
        let code = sketch_impl(quote! {
            <div uid="root" behaviour={Toggling::config(cfg)} />
        })
        .unwrap()
        .to_string();
        assert!(code.contains("with_uid (\"root\")"));
        assert!(code.contains("with_behaviour (Toggling :: config (cfg))"));
    }

    #[test]
    fn codegen_text_children_become_text_specs() {
        let code = sketch_impl(quote! { <p>"hi"</p> }).unwrap().to_string();
        assert!(code.contains("AlloySpec :: text (\"hi\")"));
    }

    #[test]
    fn codegen_plain_attribute() {
        let code = sketch_impl(quote! { <input placeholder="Type here..." /> }).unwrap().to_string();
        assert!(code.contains("with_attribute (\"placeholder\" , \"Type here...\")"));
    }

    #[test]
    fn codegen_literal_behaviour_is_error() {
        let err = sketch_impl(quote! { <div behaviour="toggling" /> }).unwrap_err().to_string();
        assert!(err.contains("configured behaviour"));
    }
}
