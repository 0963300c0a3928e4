diesel::table! {
    accounts (id) {
        id -> BigInt,
        name -> Text,
        age -> Integer,
        mobile -> Text,
        pin -> Text,
        balance -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    transactions (id) {
        id -> BigInt,
        account_id -> BigInt,
        kind -> Text,
        amount -> Text,
        created_at -> Timestamp,
        note -> Text,
    }
}

diesel::table! {
    fixed_deposits (id) {
        id -> BigInt,
        account_id -> BigInt,
        amount -> Text,
        interest_rate_bps -> SmallInt,
        tenure_months -> Integer,
        maturity_amount -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    loans (id) {
        id -> BigInt,
        account_id -> BigInt,
        amount -> Text,
        interest_rate_bps -> SmallInt,
        tenure_months -> Integer,
        state -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(transactions -> accounts (account_id));
diesel::joinable!(fixed_deposits -> accounts (account_id));
diesel::joinable!(loans -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, transactions, fixed_deposits, loans,);
