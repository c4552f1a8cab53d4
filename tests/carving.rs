use seamcarver::{
    calculate_energy, carve, find_seam, remove_seam, Channel, RasterImage, SeamBackend,
    SeamCarver, Sequential,
};

fn checkerboard(width: u32, height: u32) -> RasterImage {
    let cells: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { 0 } else { 255 }))
        .collect();
    RasterImage::new(width, height, cells.clone(), cells.clone(), cells).unwrap()
}

// Red carries the column and green the row, so every surviving pixel
// says where it came from.  Blue is noise to give the energy map shape.
fn tagged(width: u32, height: u32) -> RasterImage {
    let mut red = Vec::new();
    let mut green = Vec::new();
    let mut blue = Vec::new();
    for y in 0..height {
        for x in 0..width {
            red.push(x as u8);
            green.push(y as u8);
            blue.push(((x * 31 + y * 17) % 97 * 2) as u8);
        }
    }
    RasterImage::new(width, height, red, green, blue).unwrap()
}

fn row_pixels(image: &RasterImage, y: u32) -> Vec<[u8; 3]> {
    (0..image.width()).map(|x| image.sample(x, y)).collect()
}

fn is_subsequence(needle: &[[u8; 3]], haystack: &[[u8; 3]]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|p| rest.any(|q| q == p))
}

#[test]
fn checkerboard_loses_three_columns() {
    let original = checkerboard(10, 10);
    let carved = carve(original.clone(), 3, &Sequential).unwrap();
    assert_eq!(carved.dimensions(), (7, 10));
    for y in 0..10 {
        let row = row_pixels(&carved, y);
        assert_eq!(row.len(), 7);
        assert!(is_subsequence(&row, &row_pixels(&original, y)));
    }
}

#[test]
fn carving_preserves_order_within_rows() {
    let carved = carve(tagged(12, 8), 5, &Sequential).unwrap();
    assert_eq!(carved.dimensions(), (7, 8));
    for y in 0..8 {
        let reds = carved.plane_row(Channel::Red, y);
        assert!(reds.windows(2).all(|w| w[0] < w[1]), "row {} reordered: {:?}", y, reds);
        assert!(carved.plane_row(Channel::Green, y).iter().all(|&g| g == y as u8));
    }
}

#[test]
fn removing_a_found_seam_deletes_exactly_that_pixel() {
    let image = tagged(9, 6);
    let seam = find_seam(&image);
    assert_eq!(seam.len(), 6);
    assert!(seam.iter().all(|&x| x < 9));
    assert!(seam.windows(2).all(|w| (w[0] as i64 - w[1] as i64).abs() <= 1));

    let carved = remove_seam(&image, &seam).unwrap();
    assert_eq!(carved.dimensions(), (8, 6));
    for (y, &column) in seam.iter().enumerate() {
        let mut expected = row_pixels(&image, y as u32);
        expected.remove(column as usize);
        assert_eq!(row_pixels(&carved, y as u32), expected);
    }
}

#[test]
fn uniform_image_carves_from_the_left() {
    let image = RasterImage::new(5, 3, vec![9; 15], vec![9; 15], vec![9; 15]).unwrap();
    assert!(calculate_energy(&image).as_slice().iter().all(|&e| e == 0));
    assert_eq!(find_seam(&image), [0, 0, 0]);
}

#[test]
fn failed_removal_leaves_the_image_alone() {
    let image = tagged(4, 4);
    let before = image.clone();
    assert!(remove_seam(&image, &[0, 0, 0]).is_err());
    assert_eq!(image, before);
}

#[test]
fn carver_reports_each_seam() {
    let image = checkerboard(10, 10);
    let costs = std::cell::RefCell::new(Vec::new());
    let carver = SeamCarver::new(Sequential).with_observer(|r| costs.borrow_mut().push(r.seam_cost));
    carver.carve_to_width(image, 7).unwrap();
    assert_eq!(costs.borrow().len(), 3);
}

#[cfg(feature = "threaded")]
mod backend_equivalence {
    use super::*;
    use seamcarver::{ComputeContext, Threaded};

    fn threaded(workers: usize) -> Threaded {
        Threaded::new(ComputeContext::new(workers).unwrap())
    }

    #[test]
    fn same_energy_and_seam_for_the_same_image() {
        let images = vec![checkerboard(10, 10), tagged(37, 11), tagged(150, 9)];
        for image in &images {
            for workers in &[1, 3, 8] {
                let backend = threaded(*workers);
                let energy = Sequential.energy(image);
                assert_eq!(backend.energy(image), energy);
                assert_eq!(backend.vertical_seam(&energy), Sequential.vertical_seam(&energy));
            }
        }
    }

    #[test]
    fn same_image_after_a_full_carve() {
        let image = tagged(140, 12);
        let sequential = carve(image.clone(), 40, &Sequential).unwrap();
        let parallel = carve(image, 40, &threaded(4)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn wide_rows_split_across_workers_carve_identically() {
        let image = tagged(2100, 6);
        let sequential = carve(image.clone(), 3, &Sequential).unwrap();
        let parallel = carve(image, 3, &threaded(2)).unwrap();
        assert_eq!(parallel.dimensions(), (2097, 6));
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn ties_resolve_identically() {
        // Flat stripes make many columns cost exactly the same.
        let width = 200u32;
        let plane: Vec<u8> = (0..width * 6).map(|i| if (i % width) / 50 % 2 == 0 { 10 } else { 200 }).collect();
        let image = RasterImage::new(width, 6, plane.clone(), plane.clone(), plane).unwrap();
        assert_eq!(threaded(4).find_seam(&image), Sequential.find_seam(&image));
    }
}
