use lyceum_core::ChatMessage;

/// Cap one conversation's messages at `max_items`, evicting the oldest.
///
/// Pure: no I/O, no side effects. The target conversation's messages are
/// stable-sorted ascending by timestamp (stability is the insertion-order
/// tie-break) and the front of the sorted run is dropped until at most
/// `max_items` remain. Messages belonging to other conversations pass
/// through untouched. Returns the complete corrected collection.
pub fn prune_conversation(
    conversation_id: &str,
    messages: Vec<ChatMessage>,
    max_items: usize,
) -> Vec<ChatMessage> {
    let (mut mine, mut rest): (Vec<_>, Vec<_>) = messages
        .into_iter()
        .partition(|m| m.conversation_id == conversation_id);

    mine.sort_by_key(|m| m.timestamp);
    if mine.len() > max_items {
        mine.drain(..mine.len() - max_items);
    }

    rest.extend(mine);
    rest
}
