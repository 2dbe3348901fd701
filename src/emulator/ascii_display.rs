use super::basics::{SCREEN_HEIGHT, SCREEN_WIDTH};
use super::devices::Graphics;

/// A 64x32 monochrome framebuffer rendered as text. Sprites are drawn by
/// XOR, coordinates wrap around the screen edges, and a pixel going from
/// set to unset is reported as a collision.
pub struct AsciiDisplay {
    pixels: [[bool; SCREEN_HEIGHT as usize]; SCREEN_WIDTH as usize],
}

impl AsciiDisplay {
    pub fn new() -> AsciiDisplay {
        AsciiDisplay {
            pixels: [[false; SCREEN_HEIGHT as usize]; SCREEN_WIDTH as usize],
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> bool {
        self.pixels[x as usize][y as usize]
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..SCREEN_HEIGHT as usize {
            for x in 0..SCREEN_WIDTH as usize {
                if self.pixels[x][y] {
                    out.push('@');
                } else {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

impl Default for AsciiDisplay {
    fn default() -> AsciiDisplay {
        AsciiDisplay::new()
    }
}

impl Graphics for AsciiDisplay {
    fn draw(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collided = false;
        for (y_off, row) in rows.iter().enumerate() {
            for x_off in 0..8 {
                if row & (0x80 >> x_off) == 0 {
                    continue;
                }
                let px = (x as usize + x_off) % SCREEN_WIDTH as usize;
                let py = (y as usize + y_off) % SCREEN_HEIGHT as usize;
                let pixel = &mut self.pixels[px][py];
                if *pixel {
                    collided = true;
                }
                *pixel = !*pixel;
            }
        }
        collided
    }

    fn clear(&mut self) {
        for column in self.pixels.iter_mut() {
            for pixel in column.iter_mut() {
                *pixel = false;
            }
        }
    }
}
