table! {
    posts (id) {
        id -> Integer,
        title -> Text,
        content -> Text,
        created_at -> Timestamp,
        views -> Integer,
    }
}

table! {
    comments (id) {
        id -> Integer,
        post_id -> Integer,
        content -> Text,
        created_at -> Timestamp,
    }
}

table! {
    nested_comments (id) {
        id -> Integer,
        comment_id -> Integer,
        content -> Text,
        created_at -> Timestamp,
    }
}

table! {
    last_comments (id) {
        id -> Integer,
        nested_comment_id -> Integer,
        content -> Text,
        created_at -> Timestamp,
    }
}

table! {
    open_graphs (id) {
        id -> Integer,
        post_id -> Integer,
    }
}

joinable!(comments -> posts (post_id));
joinable!(nested_comments -> comments (comment_id));
joinable!(last_comments -> nested_comments (nested_comment_id));
joinable!(open_graphs -> posts (post_id));

allow_tables_to_appear_in_same_query!(
    comments,
    last_comments,
    nested_comments,
    open_graphs,
    posts,
);
