/// S7 Field Address Parsing Demo
///
/// Parses the addresses given on the command line, or a built-in set of
/// sample addresses, and prints the resolved fields.

use s7_field::{S7Field, FieldError};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    println!("🔧 {}", s7_field::info());
    println!("=====================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let addresses: Vec<String> = if args.is_empty() {
        [
            "%I0.1:BOOL",
            "%ID64:REAL",
            "%DB1.DBX38.1:BOOL",
            "%DB1:38.1:BOOL",
            "%DB56.DBB100:SINT[25]",
            "%DB10:4:STRING[25]",
            "10-08-00-01-00-2D-84-00-00-80",
            "10-07-00-01-00-98-84-00-06-C0",
            "%IW64:REAL",
            "%I0:BOOL",
            "%DB1:100",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    } else {
        args
    };

    for address in &addresses {
        println!("\n📥 {}", address);
        if !S7Field::matches(address) {
            println!("   ⚠️  no grammar matches this token");
        }
        match S7Field::parse(address) {
            Ok(field) => {
                println!("   ✅ {}", field);
                println!(
                    "      type={} area={} block={} byte={} bit={} elements={}",
                    field.data_type(),
                    field.memory_area(),
                    field.block_number(),
                    field.byte_offset(),
                    field.bit_offset(),
                    field.num_elements()
                );
                match field.value_category() {
                    Ok(category) => println!("      value category: {}", category),
                    Err(error) => println!("      value category: {}", error),
                }
            }
            Err(error @ FieldError::InvalidAddress { .. }) => {
                println!("   ❌ rejected: {}", error);
            }
            Err(error) => {
                println!("   🚧 capability gap: {}", error);
            }
        }
    }
}
