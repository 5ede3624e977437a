pub mod plife_vis2d;
