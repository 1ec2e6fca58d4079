mod game_over;
mod highscores;
mod pause;
mod play;
mod title;
