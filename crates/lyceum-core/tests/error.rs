use lyceum_core::LyceumError;

#[test]
fn error_variants_render_messages() {
    let errors = vec![
        LyceumError::Store("test".into()),
        LyceumError::QuotaExceeded("test".into()),
        LyceumError::ConversationNotFound("test".into()),
        LyceumError::Memory("test".into()),
    ];
    for err in &errors {
        assert!(!err.to_string().is_empty());
    }
}

#[test]
fn conversation_not_found_names_the_conversation() {
    let err = LyceumError::ConversationNotFound("conv-7".into());
    assert!(err.to_string().contains("conv-7"));
}
