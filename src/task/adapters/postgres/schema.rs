//! Diesel schema for task persistence.

diesel::table! {
    /// Task records; `name` and `rank` each carry a uniqueness constraint.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Unique task name.
        #[max_length = 255]
        name -> Varchar,
        /// Cost in whole cents.
        cost_cents -> Int8,
        /// Due date.
        due_date -> Date,
        /// Position in the ordered list; negative only inside a transaction.
        rank -> Int8,
    }
}
