//! Benchmarks bulk writes through strided views.
use brunch::Bench;

use image_pixelarray::{CellSurface, Error, PixelArray, PixelFormat};

#[derive(Clone, Copy, Debug)]
enum Write {
    Fill,
    Rows,
    Mirror,
}

struct Setup {
    format: PixelFormat,
    write: Write,
    step: isize,
    sz: usize,
}

impl Setup {
    fn name(&self) -> String {
        format!(
            "fill({:?}, {} bpp, step {}, {})",
            self.write,
            self.format.bytes_per_pixel(),
            self.step,
            self.sz
        )
    }

    fn prepare(self) -> Result<impl FnMut(), Error> {
        let surface = CellSurface::new(self.format, self.sz, self.sz);
        let array = PixelArray::new(surface)?;
        let view = array
            .slice(0, self.sz, self.step)?
            .expect("Benchmark view is not empty");

        let colors: Vec<u32> = (0..self.sz as u32).collect();
        let mirrored = array.slice(0, self.sz, -1)?.expect("Benchmark view is not empty");

        Ok(match self.write {
            Write::Fill => Box::new(move || view.fill(0x00FF_00FFu32).unwrap()) as Box<dyn FnMut()>,
            Write::Rows => Box::new(move || view.assign_colors(&colors).unwrap()),
            Write::Mirror => Box::new(move || array.copy_from(&mirrored).unwrap()),
        })
    }
}

fn main() {
    let tests = [
        Setup {
            format: PixelFormat::INDEX8,
            write: Write::Fill,
            step: 1,
            sz: 256,
        },
        Setup {
            format: PixelFormat::XRGB32,
            write: Write::Fill,
            step: 1,
            sz: 256,
        },
        Setup {
            format: PixelFormat::XRGB32,
            write: Write::Fill,
            step: -3,
            sz: 256,
        },
        // The channel-wise path.
        Setup {
            format: PixelFormat::RGB24,
            write: Write::Fill,
            step: 1,
            sz: 256,
        },
        Setup {
            format: PixelFormat::RGB24,
            write: Write::Rows,
            step: 2,
            sz: 256,
        },
        Setup {
            format: PixelFormat::XRGB32,
            write: Write::Mirror,
            step: 1,
            sz: 256,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|setup| {
        Bench::new(format!("pixelarray::fill::main::{}", setup.name()))
            .run(setup.prepare().expect("Failed to setup benchmark"))
    }));
    benches.finish();
}
