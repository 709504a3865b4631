mod in_memory_room;

pub use in_memory_room::InMemoryRoomRepository;
