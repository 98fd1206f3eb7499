mod owner_id_sequence;

pub use owner_id_sequence::OwnerIdSequence;
