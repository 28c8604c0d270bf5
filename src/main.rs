//! Benchmark driver: multiplies two random polynomials of the given
//! degree with the scalar and vectorized kernels, reports each kernel's
//! wall-clock time, the speedup ratio, and the coefficient mismatch
//! count between the two results.

use std::env;
use std::process;

use polymul_simd::{
    count_mismatches, random_fill, time_kernel, CoeffBuffer, ConvolutionKernel, Result,
    ScalarKernel, VectorKernel,
};

/// Maximum absolute coefficient value for the generated inputs. Unit
/// coefficients keep products small so long benchmark runs stay far from
/// wraparound.
const MAX_COEFF: i32 = 1;

fn usage(prog: &str, given: Option<&str>) -> ! {
    eprintln!("Usage: {prog} <degree>");
    eprintln!("   degree: Degree of the polynomials. Must be positive.");
    if let Some(given) = given {
        eprintln!("           Degree given: {given}");
    }
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("polymul");

    let degree = match args.get(1) {
        None => usage(prog, None),
        Some(raw) => match raw.parse::<usize>() {
            Ok(d) if d >= 1 => d,
            _ => usage(prog, Some(raw)),
        },
    };

    if let Err(err) = run(degree) {
        eprintln!("{prog}: {err}");
        process::exit(1);
    }
}

fn run(degree: usize) -> Result<()> {
    // Both inputs share the benchmark degree; the result degree is their
    // sum.
    let deg_a = degree;
    let deg_b = degree;
    let deg_res = deg_a + deg_b;

    let mut poly_a = CoeffBuffer::for_input(deg_a);
    let mut poly_b = CoeffBuffer::for_input(deg_b);
    let mut res_scalar = CoeffBuffer::for_product(deg_a, deg_b);
    let mut res_vector = CoeffBuffer::for_product(deg_a, deg_b);

    let scalar = ScalarKernel;
    let vector = VectorKernel::with_defaults();

    println!("Multiplication of two {degree}-degree polynomials.");
    println!("================================================");
    println!("Generating polynomials...");

    let mut rng = rand::thread_rng();
    let (_, gen_time) = time_kernel(|| {
        random_fill(&mut poly_a, deg_a, MAX_COEFF, &mut rng);
        random_fill(&mut poly_b, deg_b, MAX_COEFF, &mut rng);
    });
    println!("  Polynomial random fill time     (s): {gen_time:9.6}");

    println!("================================================");
    println!("Warm up runs...");
    let (result, warm_scalar) =
        time_kernel(|| scalar.multiply(&poly_a, deg_a, &poly_b, deg_b, &mut res_scalar));
    result?;
    println!("  Scalar poly mult execution time (s): {warm_scalar:9.6}");
    let (result, warm_vector) =
        time_kernel(|| vector.multiply(&poly_a, deg_a, &poly_b, deg_b, &mut res_vector));
    result?;
    println!("  Vector poly mult execution time (s): {warm_vector:9.6}");

    println!("================================================");
    println!("Scalar poly multiplication...");
    let (result, scalar_time) =
        time_kernel(|| scalar.multiply(&poly_a, deg_a, &poly_b, deg_b, &mut res_scalar));
    result?;
    println!("  Scalar poly mult execution time (s): {scalar_time:9.6}");

    println!("================================================");
    println!(
        "Vectorized poly multiplication ({})...",
        vector.dispatcher().capability().name()
    );
    let (result, vector_time) =
        time_kernel(|| vector.multiply(&poly_a, deg_a, &poly_b, deg_b, &mut res_vector));
    result?;
    println!("  Vector poly mult execution time (s): {vector_time:9.6}");
    println!("                              Speedup:   {:9.3}", scalar_time / vector_time);

    println!("================================================");
    println!("Comparing scalar & vectorized results...");
    let mismatches = count_mismatches(&res_vector, &res_scalar, deg_res);
    if mismatches == 0 {
        println!("  Results match!");
    } else {
        println!("  ERROR: Results mismatch! # of errors = {mismatches}");
    }

    Ok(())
}
