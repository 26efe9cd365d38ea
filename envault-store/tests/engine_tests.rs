//! End-to-end seal/open tests across both provider strategies.

use envault_crypto::{DataKeyAlgorithm, WrappingKey};
use envault_store::{
    EncryptionContext, EncryptionEngine, KmsMaterialsProvider, StoreError,
    WrappedMaterialsProvider, envelope,
};
use pretty_assertions::assert_eq;

mod support;
use support::{MockKeyService, random_bytes};

fn local_engine() -> EncryptionEngine<WrappedMaterialsProvider> {
    EncryptionEngine::new(WrappedMaterialsProvider::new(
        WrappingKey::new(random_bytes(32)).unwrap(),
    ))
}

fn kms_engine() -> EncryptionEngine<KmsMaterialsProvider<MockKeyService>> {
    EncryptionEngine::new(KmsMaterialsProvider::new("master-1", MockKeyService::new()))
}

fn ctx(object_key: &str) -> EncryptionContext {
    EncryptionContext::new("media-archive", object_key)
}

// ── The Canonical Scenario ──

#[tokio::test]
async fn foo_bar_seals_and_opens_with_local_wrapping() {
    let engine = local_engine();
    let context = ctx("notes/hello.txt");

    let (ciphertext, metadata) = engine.seal(b"foo bar", &context).await.unwrap();

    assert_ne!(&ciphertext[..], b"foo bar");
    assert_eq!(
        metadata.get(envelope::CONTENT_ALGORITHM).unwrap(),
        "AES/GCM/NoPadding"
    );
    assert_eq!(metadata.get(envelope::TAG_LENGTH_BITS).unwrap(), "128");
    assert_eq!(metadata.get(envelope::WRAP_ALGORITHM).unwrap(), "AESWrap");
    assert_eq!(
        metadata.get(envelope::UNENCRYPTED_CONTENT_LENGTH).unwrap(),
        "7"
    );

    let plaintext = engine.open(&ciphertext, &metadata, &context).await.unwrap();
    assert_eq!(plaintext, b"foo bar");
}

// ── Round Trips ──

#[tokio::test]
async fn roundtrip_every_algorithm_with_local_wrapping() {
    for algorithm in DataKeyAlgorithm::ALL {
        let engine = EncryptionEngine::new(WrappedMaterialsProvider::with_algorithm(
            WrappingKey::new(random_bytes(32)).unwrap(),
            algorithm,
        ));
        let context = ctx("objects/blob");
        let body = random_bytes(4096);

        let (ciphertext, metadata) = engine.seal(&body, &context).await.unwrap();
        assert_eq!(ciphertext.len(), body.len() + 16);
        assert_eq!(
            engine.open(&ciphertext, &metadata, &context).await.unwrap(),
            body
        );
    }
}

#[tokio::test]
async fn roundtrip_every_algorithm_with_kms() {
    for algorithm in DataKeyAlgorithm::ALL {
        let engine = EncryptionEngine::new(KmsMaterialsProvider::with_algorithm(
            "master-1",
            MockKeyService::new(),
            algorithm,
        ));
        let context = ctx("objects/blob");
        let body = random_bytes(512);

        let (ciphertext, metadata) = engine.seal(&body, &context).await.unwrap();
        assert_eq!(
            engine.open(&ciphertext, &metadata, &context).await.unwrap(),
            body
        );
    }
}

#[tokio::test]
async fn empty_body_roundtrips() {
    let engine = local_engine();
    let context = ctx("empty");

    let (ciphertext, metadata) = engine.seal(b"", &context).await.unwrap();
    assert_eq!(
        metadata.get(envelope::UNENCRYPTED_CONTENT_LENGTH).unwrap(),
        "0"
    );
    assert_eq!(
        engine.open(&ciphertext, &metadata, &context).await.unwrap(),
        b""
    );
}

#[tokio::test]
async fn each_seal_uses_fresh_materials() {
    let engine = local_engine();
    let context = ctx("same/object");

    let (first_ct, first_md) = engine.seal(b"identical body", &context).await.unwrap();
    let (second_ct, second_md) = engine.seal(b"identical body", &context).await.unwrap();

    // Fresh key and IV per call, so ciphertext and envelope both differ.
    assert_ne!(first_ct, second_ct);
    assert_ne!(
        first_md.get(envelope::IV).unwrap(),
        second_md.get(envelope::IV).unwrap()
    );
    assert_ne!(
        first_md.get(envelope::WRAPPED_DATA_KEY).unwrap(),
        second_md.get(envelope::WRAPPED_DATA_KEY).unwrap()
    );
}

// ── Tampering ──

#[tokio::test]
async fn flipped_ciphertext_bit_fails_authentication() {
    let engine = local_engine();
    let context = ctx("tamper");
    let (mut ciphertext, metadata) = engine.seal(b"authentic body", &context).await.unwrap();

    ciphertext[0] ^= 0x01;
    assert!(matches!(
        engine
            .open(&ciphertext, &metadata, &context)
            .await
            .unwrap_err(),
        StoreError::AuthenticationFailure
    ));
}

#[tokio::test]
async fn flipped_tag_bit_fails_authentication() {
    let engine = kms_engine();
    let context = ctx("tamper");
    let (mut ciphertext, metadata) = engine.seal(b"authentic body", &context).await.unwrap();

    let last = ciphertext.len() - 1; // inside the trailing tag
    ciphertext[last] ^= 0x80;
    assert!(matches!(
        engine
            .open(&ciphertext, &metadata, &context)
            .await
            .unwrap_err(),
        StoreError::AuthenticationFailure
    ));
}

#[tokio::test]
async fn swapped_iv_fails_authentication() {
    let engine = local_engine();
    let context = ctx("tamper");

    let (ciphertext, mut metadata) = engine.seal(b"authentic body", &context).await.unwrap();
    let (_, other_metadata) = engine.seal(b"another body", &context).await.unwrap();
    metadata.insert(
        envelope::IV.to_string(),
        other_metadata.get(envelope::IV).unwrap().clone(),
    );

    assert!(
        engine
            .open(&ciphertext, &metadata, &context)
            .await
            .is_err()
    );
}

// ── Metadata Errors ──

#[tokio::test]
async fn missing_wrapped_key_is_metadata_missing() {
    let engine = local_engine();
    let context = ctx("broken");
    let (ciphertext, mut metadata) = engine.seal(b"body", &context).await.unwrap();

    metadata.remove(envelope::WRAPPED_DATA_KEY);
    match engine
        .open(&ciphertext, &metadata, &context)
        .await
        .unwrap_err()
    {
        StoreError::MetadataMissing(field) => assert_eq!(field, envelope::WRAPPED_DATA_KEY),
        other => panic!("expected MetadataMissing, got: {other:?}"),
    }
}

#[tokio::test]
async fn kms_identity_mismatch_fails_open() {
    let engine = kms_engine();

    let (ciphertext, metadata) = engine
        .seal(b"bound to one object", &ctx("payroll/alice"))
        .await
        .unwrap();
    assert!(matches!(
        engine
            .open(&ciphertext, &metadata, &ctx("payroll/mallory"))
            .await
            .unwrap_err(),
        StoreError::UnwrapFailure(_)
    ));
}
