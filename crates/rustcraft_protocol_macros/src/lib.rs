//! Derive macros for `rustcraft_protocol`'s reflective packet (de)serializer
//! (C11) and NBT struct mapping (C6/§4.13): compile-time code generation in
//! place of a runtime-reflective marshaller, grounded in the same
//! macro-crate split the teacher's workspace already declares for
//! `azalea-buf-macros` / `azalea-protocol-macros`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

/// `#[derive(McPacket)]`: generates `rustcraft_protocol::packet::McPacket`
/// for a record-shaped struct, with a field-declaration-order wire layout.
///
/// Per-field `#[mc(...)]` options:
///   - `skip` — not present on the wire; requires the field type to impl
///     `Default`.
///   - `length = N` — the field is a fixed-size `Vec<u8>` with no count
///     prefix on the wire.
///   - `if = "other_field"` / `if = "other_field", value = V` — the field is
///     `Option<T>`, present iff `other_field` is truthy (or equals `V`).
///   - `prefixed` — the field is `Vec<T>`, `VarInt count` then elements
///     (the default for `Vec<T>` fields with no attribute).
///   - `fixed` — paired with `length = N`: `Vec<T>` with no count prefix,
///     exactly `N` elements.
#[proc_macro_derive(McPacket, attributes(mc))]
pub fn derive_mc_packet(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    mc_packet_impl(input).unwrap_or_else(|e| e.to_compile_error()).into()
}

struct FieldOpts {
    skip:   bool,
    length: Option<TokenStream2>,
    cond:   Option<(syn::Ident, Option<Lit>)>,
    fixed:  bool,
}

fn parse_mc_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldOpts> {
    let mut opts = FieldOpts {
        skip:   false,
        length: None,
        cond:   None,
        fixed:  false,
    };
    for attr in attrs {
        if !attr.path().is_ident("mc") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                opts.skip = true;
            } else if meta.path.is_ident("fixed") {
                opts.fixed = true;
            } else if meta.path.is_ident("prefixed") {
                // Default behavior for Vec<T>; accepted as a no-op marker for
                // symmetry with `fixed`.
            } else if meta.path.is_ident("length") {
                let value = meta.value()?;
                let lit: syn::LitInt = value.parse()?;
                opts.length = Some(quote! { #lit });
            } else if meta.path.is_ident("if") {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                let ident = syn::Ident::new(&lit.value(), lit.span());
                opts.cond = Some((ident, None));
            } else if meta.path.is_ident("value") {
                let value = meta.value()?;
                let lit: Lit = value.parse()?;
                if let Some((_, v)) = opts.cond.as_mut() {
                    *v = Some(lit);
                }
            }
            Ok(())
        })?;
    }
    Ok(opts)
}

fn mc_packet_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "McPacket can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input, "McPacket requires named fields"));
    };

    let mut decode_stmts = Vec::new();
    let mut construct_fields = Vec::new();
    let mut encode_stmts = Vec::new();

    for field in &fields.named {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_ty = &field.ty;
        let opts = parse_mc_attrs(&field.attrs)?;

        if opts.skip {
            decode_stmts.push(quote! {
                let #field_ident: #field_ty = ::std::default::Default::default();
            });
            construct_fields.push(quote! { #field_ident });
            continue;
        }

        if let (Some(_), Some(len)) = (&opts.cond, &opts.length) {
            decode_stmts.push(quote! {
                let #field_ident: #field_ty = ::rustcraft_protocol::packet::decode_optional_fixed_bytes(r, #len as usize)?;
            });
            encode_stmts.push(quote! {
                ::rustcraft_protocol::packet::encode_optional_fixed_bytes(w, &self.#field_ident);
            });
            construct_fields.push(quote! { #field_ident });
            continue;
        }

        if let Some((cond_field, cond_value)) = &opts.cond {
            let test = match cond_value {
                Some(v) => quote! { #cond_field == #v },
                None => quote! { #cond_field },
            };
            decode_stmts.push(quote! {
                let #field_ident: #field_ty = if #test {
                    Some(::rustcraft_protocol::primitive::Decode::decode(r)?)
                } else {
                    None
                };
            });
            encode_stmts.push(quote! {
                if let Some(v) = &self.#field_ident {
                    ::rustcraft_protocol::primitive::Encode::encode(v, w);
                }
            });
            construct_fields.push(quote! { #field_ident });
            continue;
        }

        if let Some(len) = &opts.length {
            if opts.fixed {
                decode_stmts.push(quote! {
                    let #field_ident: #field_ty = ::rustcraft_protocol::packet::decode_fixed_vec(
                        r, #len as usize, |r| ::rustcraft_protocol::primitive::Decode::decode(r),
                    )?;
                });
                encode_stmts.push(quote! {
                    ::rustcraft_protocol::packet::encode_fixed_vec(w, &self.#field_ident, |w, v| {
                        ::rustcraft_protocol::primitive::Encode::encode(v, w)
                    });
                });
            } else {
                decode_stmts.push(quote! {
                    let #field_ident: #field_ty = ::rustcraft_protocol::packet::decode_fixed_bytes(r, #len as usize)?;
                });
                encode_stmts.push(quote! {
                    ::rustcraft_protocol::packet::encode_fixed_bytes(w, &self.#field_ident);
                });
            }
            construct_fields.push(quote! { #field_ident });
            continue;
        }

        // Default: the field type owns its own `Encode`/`Decode`.
        decode_stmts.push(quote! {
            let #field_ident: #field_ty = ::rustcraft_protocol::primitive::Decode::decode(r)?;
        });
        encode_stmts.push(quote! {
            ::rustcraft_protocol::primitive::Encode::encode(&self.#field_ident, w);
        });
        construct_fields.push(quote! { #field_ident });
    }

    Ok(quote! {
        impl #impl_generics ::rustcraft_protocol::packet::McPacket for #name #ty_generics #where_clause {
            fn decode(r: &mut ::rustcraft_protocol::io::Reader) -> ::rustcraft_protocol::error::Result<Self> {
                #(#decode_stmts)*
                Ok(Self { #(#construct_fields),* })
            }

            fn encode(&self, w: &mut ::rustcraft_protocol::io::Writer) {
                #(#encode_stmts)*
            }
        }
    })
}

/// `#[derive(NbtMarshal)]`: generates `rustcraft_protocol::nbt::mapping::NbtMarshal`
/// for a record-shaped struct.
///
/// Per-field `#[nbt(...)]` options:
///   - `rename = "name"` — the Compound key, default the field's Rust name.
///   - `skip` — excluded from the Compound entirely (both directions;
///     `unmarshal` leaves the field at its `Default`).
///   - `omitempty` — on marshal, the field is left out of the Compound when
///     it equals its `Default` value.
#[proc_macro_derive(NbtMarshal, attributes(nbt))]
pub fn derive_nbt_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    nbt_marshal_impl(input).unwrap_or_else(|e| e.to_compile_error()).into()
}

struct NbtFieldOpts {
    rename:    Option<String>,
    skip:      bool,
    omitempty: bool,
}

fn parse_nbt_attrs(attrs: &[syn::Attribute]) -> syn::Result<NbtFieldOpts> {
    let mut opts = NbtFieldOpts {
        rename:    None,
        skip:      false,
        omitempty: false,
    };
    for attr in attrs {
        if !attr.path().is_ident("nbt") {
            continue;
        }
        if let Meta::List(_) = &attr.meta {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    opts.skip = true;
                } else if meta.path.is_ident("omitempty") {
                    opts.omitempty = true;
                } else if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    opts.rename = Some(lit.value());
                }
                Ok(())
            })?;
        }
    }
    Ok(opts)
}

fn nbt_marshal_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input, "NbtMarshal can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input, "NbtMarshal requires named fields"));
    };

    let mut marshal_stmts = Vec::new();
    let mut unmarshal_stmts = Vec::new();
    let mut construct_fields = Vec::new();

    for field in &fields.named {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_ty = &field.ty;
        let opts = parse_nbt_attrs(&field.attrs)?;
        let key = opts.rename.unwrap_or_else(|| field_ident.to_string());

        if opts.skip {
            unmarshal_stmts.push(quote! {
                let #field_ident: #field_ty = ::std::default::Default::default();
            });
            construct_fields.push(quote! { #field_ident });
            continue;
        }

        if opts.omitempty {
            marshal_stmts.push(quote! {
                if self.#field_ident != <#field_ty as ::std::default::Default>::default() {
                    compound.insert(#key.to_string(), ::rustcraft_protocol::nbt::mapping::NbtMarshal::marshal(&self.#field_ident));
                }
            });
            // A field omitted from the wire because it equalled its default must
            // come back as that same default, not by probing `unmarshal(Tag::End)` —
            // only `Option<T>` tolerates that sentinel, every other impl errors on it.
            unmarshal_stmts.push(quote! {
                let #field_ident: #field_ty = match compound.get(#key) {
                    Some(tag) => ::rustcraft_protocol::nbt::mapping::NbtMarshal::unmarshal(tag)?,
                    None => ::std::default::Default::default(),
                };
            });
        } else {
            marshal_stmts.push(quote! {
                compound.insert(#key.to_string(), ::rustcraft_protocol::nbt::mapping::NbtMarshal::marshal(&self.#field_ident));
            });
            unmarshal_stmts.push(quote! {
                let #field_ident: #field_ty = match compound.get(#key) {
                    Some(tag) => ::rustcraft_protocol::nbt::mapping::NbtMarshal::unmarshal(tag)?,
                    None => ::rustcraft_protocol::nbt::mapping::NbtMarshal::unmarshal(&::rustcraft_protocol::nbt::Tag::End)?,
                };
            });
        }
        construct_fields.push(quote! { #field_ident });
    }

    Ok(quote! {
        impl #impl_generics ::rustcraft_protocol::nbt::mapping::NbtMarshal for #name #ty_generics #where_clause {
            fn marshal(&self) -> ::rustcraft_protocol::nbt::Tag {
                let mut compound = ::rustcraft_protocol::nbt::Compound::new();
                #(#marshal_stmts)*
                ::rustcraft_protocol::nbt::Tag::Compound(compound)
            }

            fn unmarshal(tag: &::rustcraft_protocol::nbt::Tag) -> ::rustcraft_protocol::error::Result<Self> {
                let compound = tag.as_compound().ok_or(::rustcraft_protocol::error::Error::UnsupportedType("expected Compound for struct unmarshal"))?;
                #(#unmarshal_stmts)*
                Ok(Self { #(#construct_fields),* })
            }
        }
    })
}
