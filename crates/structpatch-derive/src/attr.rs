use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

///
/// FieldAttrs
///
/// Naming metadata collected from `#[patch]` and `#[serde]` attributes.
///

#[derive(Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub omit_empty: bool,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut serde = Self::default();
        let mut patch = Self::default();

        for attr in attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| serde.parse_serde(&meta))?;
            } else if attr.path().is_ident("patch") {
                attr.parse_nested_meta(|meta| patch.parse_patch(&meta))?;
            }
        }

        Ok(Self {
            rename: patch.rename.or(serde.rename),
            skip: patch.skip || serde.skip,
            omit_empty: patch.omit_empty || serde.omit_empty,
        })
    }

    fn parse_patch(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            let name: LitStr = meta.value()?.parse()?;
            self.rename = Some(name.value());
        } else if meta.path.is_ident("skip") {
            self.skip = true;
        } else if meta.path.is_ident("omit_empty") {
            self.omit_empty = true;
        } else {
            return Err(meta.error("expected `rename`, `skip` or `omit_empty`"));
        }
        Ok(())
    }

    // serde carries many options we do not care about; consume them quietly.
    fn parse_serde(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
            let name: LitStr = meta.value()?.parse()?;
            self.rename = Some(name.value());
            return Ok(());
        }
        if meta.path.is_ident("skip") {
            self.skip = true;
        } else if meta.path.is_ident("skip_serializing_if") {
            self.omit_empty = true;
        }
        skip_meta(meta)
    }
}

fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(attrs: Vec<Attribute>) -> syn::Result<FieldAttrs> {
        FieldAttrs::parse(&attrs)
    }

    #[test]
    fn patch_wins_over_serde() {
        let attrs = parse(parse_quote! {
            #[serde(rename = "serdeName", default)]
            #[patch(rename = "patchName")]
        })
        .unwrap();
        assert_eq!(attrs.rename.as_deref(), Some("patchName"));
    }

    #[test]
    fn serde_options_are_read_or_ignored() {
        let attrs = parse(parse_quote! {
            #[serde(rename = "alias", skip_serializing_if = "Option::is_none", with = "ts")]
        })
        .unwrap();
        assert_eq!(attrs.rename.as_deref(), Some("alias"));
        assert!(attrs.omit_empty);
        assert!(!attrs.skip);

        let attrs = parse(parse_quote! {
            #[serde(skip, rename(serialize = "x"))]
        })
        .unwrap();
        assert!(attrs.skip);
        assert_eq!(attrs.rename, None);
    }

    #[test]
    fn unknown_patch_option_is_an_error() {
        let err = parse(parse_quote! {
            #[patch(flatten)]
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("expected `rename`, `skip` or `omit_empty`"));
    }
}
