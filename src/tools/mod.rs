pub mod auto_player;
